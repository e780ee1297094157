//! Identifier masking for log output

/// Mask a phone number, keeping only the last 4 characters
///
/// ```
/// use otp_shared::mask_phone;
/// assert_eq!(mask_phone("+1234567890"), "+******7890");
/// ```
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible = 4;
    let last: String = chars[chars.len() - visible..].iter().collect();
    if chars[0] == '+' {
        format!("+{}{}", "*".repeat(chars.len() - visible - 1), last)
    } else {
        format!("{}{}", "*".repeat(chars.len() - visible), last)
    }
}

/// Mask an email address, keeping the first character of the local part and the domain
///
/// ```
/// use otp_shared::mask_email;
/// assert_eq!(mask_email("alice@example.com"), "a****@example.com");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match chars.next() {
                Some(first) => format!("{}{}@{}", first, "*".repeat(chars.count()), domain),
                None => format!("@{}", domain),
            }
        }
        None => "*".repeat(email.chars().count()),
    }
}
