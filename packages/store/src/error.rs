use thiserror::Error;

/// A form or input rejected before any backend call.
///
/// The `Display` text is what the user sees in the failure notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("Please select at least one child")]
    NoChildrenSelected,

    #[error("Please enter pickup and dropoff locations")]
    MissingLocations,

    #[error("Please enter valid coordinates")]
    MalformedCoordinates,

    #[error("Please select date and time")]
    MissingSchedule,

    #[error("Please enter a valid date and time")]
    MalformedSchedule,

    #[error("Please enter receiver ID and message")]
    MissingMessageFields,

    #[error("Please enter a valid principal ID")]
    InvalidPrincipal,

    #[error("Please enter your name")]
    MissingName,

    #[error("Please enter a valid phone number")]
    InvalidPhoneNumber,

    #[error("Please enter the complete {length}-digit OTP")]
    IncompleteOtp { length: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialise config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
