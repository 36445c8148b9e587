//! Small component kit shared by every view.
//!
//! Styling lives in `assets/saferide.css`; components only pick class names.

mod alert;
mod avatar;
mod badge;
mod button;
mod card;
mod collapsible;
mod dialog;
mod input;
mod otp_input;
mod spinner;
mod tabs;

pub use alert::{Alert, AlertVariant};
pub use avatar::{initials, Avatar};
pub use badge::{tone_class, Badge, StatusBadgeView};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use card::{Card, CardContent, CardDescription, CardHeader, CardTitle};
pub use collapsible::Collapsible;
pub use dialog::Dialog;
pub use input::{Checkbox, Input, Label, Textarea, TextareaVariant};
pub use otp_input::OtpInput;
pub use spinner::Spinner;
pub use tabs::{TabItem, Tabs};
