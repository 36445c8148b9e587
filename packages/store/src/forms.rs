//! # Client-side form validation
//!
//! Each form is a plain struct holding the raw input strings, as the view binds
//! them. `validate` turns it into the typed request for the backend or returns a
//! [`ValidationError`] whose text is shown to the user. A form that fails
//! validation never reaches the actor.
//!
//! | Form | Produces |
//! |------|----------|
//! | [`ChildProfileForm`] | [`NewChildProfile`] |
//! | [`TripBookingForm`] | [`NewTripRequest`] (scheduled time in nanoseconds) |
//! | [`MessageForm`] | receiver [`Principal`] + trimmed text |
//! | [`ProfileForm`] | [`UserProfile`] |
//! | phone sign-in | [`PhoneNumber`], [`OtpCode`] |

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::ValidationError;
use crate::models::{millis_to_nanos, Location, Principal, Role, UserProfile};

pub const DEFAULT_OTP_LENGTH: usize = 6;
const MIN_PHONE_LEN: usize = 10;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChildProfileForm {
    pub name: String,
    pub grade: String,
    pub allergies: String,
    pub emergency_contact: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewChildProfile {
    pub name: String,
    pub grade: String,
    pub allergies: Option<String>,
    pub emergency_contact: String,
}

impl ChildProfileForm {
    pub fn validate(&self) -> Result<NewChildProfile, ValidationError> {
        let name = self.name.trim();
        let grade = self.grade.trim();
        let emergency_contact = self.emergency_contact.trim();
        if name.is_empty() || grade.is_empty() || emergency_contact.is_empty() {
            return Err(ValidationError::MissingRequiredFields);
        }
        let allergies = self.allergies.trim();
        Ok(NewChildProfile {
            name: name.to_string(),
            grade: grade.to_string(),
            allergies: (!allergies.is_empty()).then(|| allergies.to_string()),
            emergency_contact: emergency_contact.to_string(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripBookingForm {
    pub selected_children: Vec<String>,
    pub pickup_lat: String,
    pub pickup_lng: String,
    pub dropoff_lat: String,
    pub dropoff_lng: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub time: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTripRequest {
    pub children_ids: Vec<String>,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    /// Nanoseconds since the Unix epoch.
    pub scheduled_time: u64,
}

impl TripBookingForm {
    /// Select a child if unselected, unselect otherwise.
    pub fn toggle_child(&mut self, name: &str) {
        if let Some(pos) = self.selected_children.iter().position(|c| c == name) {
            self.selected_children.remove(pos);
        } else {
            self.selected_children.push(name.to_string());
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_children.iter().any(|c| c == name)
    }

    /// Validate against the caller's local timezone `tz`.
    pub fn validate<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewTripRequest, ValidationError> {
        if self.selected_children.is_empty() {
            return Err(ValidationError::NoChildrenSelected);
        }
        let coords = [
            &self.pickup_lat,
            &self.pickup_lng,
            &self.dropoff_lat,
            &self.dropoff_lng,
        ];
        if coords.iter().any(|c| c.trim().is_empty()) {
            return Err(ValidationError::MissingLocations);
        }
        let pickup_location = parse_location(&self.pickup_lat, &self.pickup_lng)?;
        let dropoff_location = parse_location(&self.dropoff_lat, &self.dropoff_lng)?;

        if self.date.trim().is_empty() || self.time.trim().is_empty() {
            return Err(ValidationError::MissingSchedule);
        }
        let scheduled = parse_schedule(&self.date, &self.time)?;
        let millis = tz
            .from_local_datetime(&scheduled)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .ok_or(ValidationError::MalformedSchedule)?;
        let millis = u64::try_from(millis).map_err(|_| ValidationError::MalformedSchedule)?;

        Ok(NewTripRequest {
            children_ids: self.selected_children.clone(),
            pickup_location,
            dropoff_location,
            scheduled_time: millis_to_nanos(millis),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::MalformedCoordinates)
}

fn parse_location(lat: &str, lng: &str) -> Result<Location, ValidationError> {
    Location::new(parse_coordinate(lat)?, parse_coordinate(lng)?).validate()
}

fn parse_schedule(date: &str, time: &str) -> Result<NaiveDateTime, ValidationError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::MalformedSchedule)?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| ValidationError::MalformedSchedule)?;
    Ok(date.and_time(time))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageForm {
    pub receiver: String,
    pub text: String,
}

impl MessageForm {
    pub fn validate(&self) -> Result<(Principal, String), ValidationError> {
        let text = self.text.trim();
        if self.receiver.trim().is_empty() || text.is_empty() {
            return Err(ValidationError::MissingMessageFields);
        }
        Ok((self.receiver.parse()?, text.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub role: Option<Role>,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<UserProfile, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        Ok(UserProfile {
            name: name.to_string(),
            role: self.role,
        })
    }
}

/// A phone number accepted by the mobile sign-in dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ');
        if trimmed.len() < MIN_PHONE_LEN || !trimmed.chars().all(allowed) {
            return Err(ValidationError::InvalidPhoneNumber);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A complete one-time passcode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn parse(raw: &str, length: usize) -> Result<Self, ValidationError> {
        if raw.len() != length || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::IncompleteOtp { length });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn child_form() -> ChildProfileForm {
        ChildProfileForm {
            name: "Ada".to_string(),
            grade: "Grade 5".to_string(),
            allergies: String::new(),
            emergency_contact: "555-0100".to_string(),
        }
    }

    fn booking_form() -> TripBookingForm {
        TripBookingForm {
            selected_children: vec!["Ada".to_string()],
            pickup_lat: "40.0".to_string(),
            pickup_lng: "-73.0".to_string(),
            dropoff_lat: "40.1".to_string(),
            dropoff_lng: "-73.1".to_string(),
            date: "2024-09-02".to_string(),
            time: "07:30".to_string(),
        }
    }

    #[test]
    fn test_child_form_valid() {
        let child = child_form().validate().unwrap();
        assert_eq!(child.name, "Ada");
        assert_eq!(child.allergies, None);

        let mut form = child_form();
        form.allergies = "  peanuts ".to_string();
        assert_eq!(form.validate().unwrap().allergies.as_deref(), Some("peanuts"));
    }

    #[test]
    fn test_child_form_requires_fields() {
        let blanks: [fn(&mut ChildProfileForm); 3] = [
            |f| f.name.clear(),
            |f| f.grade = "  ".to_string(),
            |f| f.emergency_contact.clear(),
        ];
        for blank in blanks {
            let mut form = child_form();
            blank(&mut form);
            assert_eq!(form.validate(), Err(ValidationError::MissingRequiredFields));
        }
    }

    #[test]
    fn test_booking_converts_to_nanos() {
        let request = booking_form().validate(&Utc).unwrap();
        let millis = NaiveDate::from_ymd_opt(2024, 9, 2)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis() as u64;
        assert_eq!(request.scheduled_time, millis * 1_000_000);
        assert_eq!(request.pickup_location, Location::new(40.0, -73.0));
        assert_eq!(request.dropoff_location, Location::new(40.1, -73.1));
        assert_eq!(request.children_ids, vec!["Ada".to_string()]);
    }

    #[test]
    fn test_booking_uses_local_timezone() {
        let utc = booking_form().validate(&Utc).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = booking_form().validate(&east).unwrap();
        assert_eq!(utc.scheduled_time - local.scheduled_time, 2 * 3600 * 1_000_000_000);
    }

    #[test]
    fn test_booking_validation_order() {
        let mut form = booking_form();
        form.selected_children.clear();
        form.pickup_lat.clear();
        assert_eq!(form.validate(&Utc), Err(ValidationError::NoChildrenSelected));

        let mut form = booking_form();
        form.dropoff_lng.clear();
        assert_eq!(form.validate(&Utc), Err(ValidationError::MissingLocations));

        let mut form = booking_form();
        form.pickup_lat = "north".to_string();
        assert_eq!(form.validate(&Utc), Err(ValidationError::MalformedCoordinates));

        let mut form = booking_form();
        form.dropoff_lat = "95".to_string();
        assert_eq!(form.validate(&Utc), Err(ValidationError::MalformedCoordinates));

        let mut form = booking_form();
        form.time.clear();
        assert_eq!(form.validate(&Utc), Err(ValidationError::MissingSchedule));

        let mut form = booking_form();
        form.date = "02/09/2024".to_string();
        assert_eq!(form.validate(&Utc), Err(ValidationError::MalformedSchedule));
    }

    #[test]
    fn test_booking_time_with_seconds() {
        let mut form = booking_form();
        form.time = "07:30:15".to_string();
        let with_secs = form.validate(&Utc).unwrap();
        let without = booking_form().validate(&Utc).unwrap();
        assert_eq!(with_secs.scheduled_time - without.scheduled_time, 15_000_000_000);
    }

    #[test]
    fn test_toggle_child_and_clear() {
        let mut form = TripBookingForm::default();
        form.toggle_child("Ada");
        form.toggle_child("Bo");
        assert!(form.is_selected("Ada"));
        form.toggle_child("Ada");
        assert_eq!(form.selected_children, vec!["Bo".to_string()]);
        form.clear();
        assert_eq!(form, TripBookingForm::default());
    }

    #[test]
    fn test_message_form() {
        let form = MessageForm {
            receiver: "parent-1".to_string(),
            text: "  running late  ".to_string(),
        };
        let (receiver, text) = form.validate().unwrap();
        assert_eq!(receiver.as_str(), "parent-1");
        assert_eq!(text, "running late");

        let form = MessageForm {
            receiver: "parent-1".to_string(),
            text: "   ".to_string(),
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingMessageFields));
    }

    #[test]
    fn test_profile_form() {
        let form = ProfileForm {
            name: " Sam ".to_string(),
            role: Some(Role::Driver),
        };
        assert_eq!(form.validate().unwrap().name, "Sam");
        assert_eq!(ProfileForm::default().validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_phone_and_otp() {
        assert!(PhoneNumber::parse("+1 (555) 010-0100").is_ok());
        assert_eq!(
            PhoneNumber::parse("12345"),
            Err(ValidationError::InvalidPhoneNumber)
        );
        assert!(PhoneNumber::parse("555-call-me-now").is_err());

        assert_eq!(OtpCode::parse("123456", 6).unwrap().as_str(), "123456");
        assert_eq!(
            OtpCode::parse("12345", 6),
            Err(ValidationError::IncompleteOtp { length: 6 })
        );
        assert!(OtpCode::parse("12a456", 6).is_err());
    }
}
