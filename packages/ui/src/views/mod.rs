mod common;

mod header;
pub use header::{Footer, Header};

mod shell;
pub use shell::AppShell;

mod login;
pub use login::LoginScreen;

mod privacy;
pub use privacy::{PrivacyNoticeBanner, PrivacyPolicyView};

mod profile_setup;
pub use profile_setup::ProfileSetup;

mod role_selection;
pub use role_selection::RoleSelection;

mod dashboard;
pub use dashboard::RoleDashboard;

mod children;
pub use children::ChildrenManagement;

mod trip_booking;
pub use trip_booking::TripBooking;

mod trip_tracking;
pub use trip_tracking::TripTracking;

mod chat;
pub use chat::{DriverChat, ParentChat};

mod assigned_routes;
pub use assigned_routes::AssignedRoutes;

mod location_sharing;
pub use location_sharing::LocationSharingView;

mod system_overview;
pub use system_overview::SystemOverview;

mod user_management;
pub use user_management::UserManagement;

mod project_export;
pub use project_export::{bundle_link, ProjectExport};
