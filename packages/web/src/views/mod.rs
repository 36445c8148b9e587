mod home;
pub use home::Home;

mod privacy;
pub use privacy::Privacy;
