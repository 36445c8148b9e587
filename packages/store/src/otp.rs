//! Slot layout and input state for one-time passcode entry.

/// A rendered position in the OTP input row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpSlot {
    Digit(usize),
    Separator,
}

/// One slot per digit, with a separator after every `separator_every` digits.
///
/// No separator follows the last digit; `separator_every == 0` disables them.
pub fn otp_layout(length: usize, separator_every: usize) -> Vec<OtpSlot> {
    let mut slots = Vec::with_capacity(length * 2);
    for idx in 0..length {
        slots.push(OtpSlot::Digit(idx));
        let end_of_group = separator_every > 0 && (idx + 1) % separator_every == 0;
        if end_of_group && idx + 1 != length {
            slots.push(OtpSlot::Separator);
        }
    }
    slots
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpEntry {
    length: usize,
    value: String,
}

impl OtpEntry {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            value: String::new(),
        }
    }

    /// Replace the value with the digits of `raw`, truncated to the length.
    pub fn set(&mut self, raw: &str) {
        self.value = raw
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(self.length)
            .collect();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.value.len() == self.length
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.value.chars().nth(idx)
    }

    /// Index of the slot that receives the next digit.
    pub fn active_index(&self) -> Option<usize> {
        (!self.is_complete()).then_some(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OtpSlot::{Digit, Separator};

    #[test]
    fn test_layout_with_groups() {
        assert_eq!(
            otp_layout(6, 3),
            vec![Digit(0), Digit(1), Digit(2), Separator, Digit(3), Digit(4), Digit(5)]
        );
        assert_eq!(
            otp_layout(6, 2),
            vec![
                Digit(0),
                Digit(1),
                Separator,
                Digit(2),
                Digit(3),
                Separator,
                Digit(4),
                Digit(5)
            ]
        );
    }

    #[test]
    fn test_layout_without_separators() {
        assert_eq!(otp_layout(4, 0), vec![Digit(0), Digit(1), Digit(2), Digit(3)]);
        // group size equal to length never adds a trailing separator
        assert!(!otp_layout(6, 6).contains(&Separator));
        assert!(otp_layout(0, 3).is_empty());
    }

    #[test]
    fn test_entry_accepts_digits_only() {
        let mut entry = OtpEntry::new(6);
        entry.set("12a3-45");
        assert_eq!(entry.value(), "12345");
        assert!(!entry.is_complete());
        assert_eq!(entry.active_index(), Some(5));

        entry.set("1234567");
        assert_eq!(entry.value(), "123456");
        assert!(entry.is_complete());
        assert_eq!(entry.char_at(5), Some('6'));
        assert_eq!(entry.active_index(), None);
    }
}
