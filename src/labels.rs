//! Letter labels for joints, used only when reading or printing trusses.
//!
//! Joints are addressed by integer index everywhere inside the crate. At the
//! I/O boundary index 0 is `A`, 25 is `Z`, 26 is `AA` and so on.

/// Display label of the joint at `index`.
///
/// # Examples
/// ```
/// use trussjoint::labels::joint_label;
///
/// assert_eq!(joint_label(0), "A");
/// assert_eq!(joint_label(6), "G");
/// assert_eq!(joint_label(26), "AA");
/// ```
#[must_use]
pub fn joint_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index;
    loop {
        // remaining % 26 < 26, so the cast cannot truncate
        letters.push(char::from(b'A' + (remaining % 26) as u8));
        if remaining < 26 {
            break;
        }
        remaining = remaining / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Joint index named by `label`, or `None` if it is not an uppercase label.
#[must_use]
pub fn parse_joint_label(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    label
        .chars()
        .try_fold(0_usize, |acc, c| {
            if !c.is_ascii_uppercase() {
                return None;
            }
            let digit = (c as usize) - ('A' as usize) + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })
        .map(|value| value - 1)
}

/// Display label of the member joining `a` and `b`, lower index first.
#[must_use]
pub fn member_label(a: usize, b: usize) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    format!("{}{}", joint_label(low), joint_label(high))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_roundtrip_across_letter_boundaries() {
        for index in [0, 1, 25, 26, 27, 51, 52, 701, 702] {
            let label = joint_label(index);
            assert_eq!(parse_joint_label(&label), Some(index), "label {label}");
        }
        assert_eq!(joint_label(25), "Z");
        assert_eq!(joint_label(27), "AB");
        assert_eq!(joint_label(702), "AAA");
    }

    #[test]
    fn largest_index_still_has_a_label() {
        let label = joint_label(usize::MAX);
        assert!(!label.is_empty());
        assert!(label.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn malformed_labels_are_rejected() {
        assert_eq!(parse_joint_label(""), None);
        assert_eq!(parse_joint_label("a"), None);
        assert_eq!(parse_joint_label("A1"), None);
        assert_eq!(parse_joint_label("ÄB"), None);
    }

    #[test]
    fn member_labels_are_canonical() {
        assert_eq!(member_label(4, 1), "BE");
        assert_eq!(member_label(1, 4), "BE");
    }
}
