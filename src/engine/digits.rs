use super::Countdown;

/// Shown in place of the countdown once an exam has started.
pub const COMPLETED_LABEL: &str = "পরীক্ষা হয়ে গেছে";

const BENGALI_DIGITS: [char; 10] = ['০', '১', '২', '৩', '৪', '৫', '৬', '৭', '৮', '৯'];

/// Replace every ASCII digit with its Bengali counterpart, leaving all other
/// characters alone.
pub fn localize_digits(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                BENGALI_DIGITS[usize::from(c as u8 - b'0')]
            } else {
                c
            }
        })
        .collect()
}

/// Zero-pad to at least two digits.
pub fn pad2(value: i64) -> String {
    format!("{value:02}")
}

/// Render a countdown with Bengali digits. `compact` uses the one- or
/// two-letter unit abbreviations for narrow columns.
pub fn format_countdown(countdown: &Countdown, compact: bool) -> String {
    if countdown.completed {
        return COMPLETED_LABEL.to_string();
    }

    let units = if compact {
        ["দি", "ঘ", "মি", "সে"]
    } else {
        ["দিন", "ঘণ্টা", "মিনিট", "সেকেন্ড"]
    };
    let values = [
        countdown.days,
        countdown.hours,
        countdown.minutes,
        countdown.seconds,
    ];

    values
        .iter()
        .zip(units)
        .map(|(value, unit)| format!("{}{unit}", localize_digits(&pad2(*value))))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_ascii_digit() {
        assert_eq!(localize_digits("0123456789"), "০১২৩৪৫৬৭৮৯");
        assert_eq!(localize_digits("Unit 7, seat 42"), "Unit ৭, seat ৪২");
        assert_eq!(localize_digits("৫ already"), "৫ already");
    }

    #[test]
    fn pads_before_localizing() {
        assert_eq!(pad2(3), "03");
        assert_eq!(pad2(123), "123");
        assert_eq!(localize_digits(&pad2(0)), "০০");
    }

    #[test]
    fn formats_full_and_compact() {
        let left = Countdown {
            days: 1,
            hours: 1,
            minutes: 1,
            seconds: 1,
            completed: false,
        };
        assert_eq!(format_countdown(&left, false), "০১দিন ০১ঘণ্টা ০১মিনিট ০১সেকেন্ড");
        assert_eq!(format_countdown(&left, true), "০১দি ০১ঘ ০১মি ০১সে");
        assert_eq!(format_countdown(&Countdown::completed(), false), COMPLETED_LABEL);
    }
}
