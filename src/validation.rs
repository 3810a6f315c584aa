//! Submission gate for the article URL form.
//!
//! Blank inputs are ignored; the remaining URLs must number between one and
//! the configured maximum. The error's `Display` text is the message shown to
//! the user.

use thiserror::Error;

/// Why a submission was blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter at least one URL")]
    Empty,

    #[error("Maximum {max} URLs allowed")]
    TooMany { max: usize, count: usize },
}

/// Keep the non-blank values, in input order
pub fn collect_urls<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter(|v| !v.as_ref().trim().is_empty())
        .map(|v| v.as_ref().to_string())
        .collect()
}

/// Validate raw input values against the `1..=max_urls` bound
///
/// Returns the accepted URLs on success.
pub fn validate_urls<I, S>(values: I, max_urls: usize) -> Result<Vec<String>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let urls = collect_urls(values);
    match urls.len() {
        0 => Err(ValidationError::Empty),
        count if count > max_urls => Err(ValidationError::TooMany { max: max_urls, count }),
        _ => Ok(urls),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_values_is_empty() {
        let values: Vec<&str> = Vec::new();
        assert_eq!(validate_urls(values, 5), Err(ValidationError::Empty));
    }

    #[test]
    fn test_whitespace_only_counts_as_blank() {
        let result = validate_urls(["", "   ", "\t\n"], 5);
        assert_eq!(result, Err(ValidationError::Empty));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Please enter at least one URL"
        );
    }

    #[test]
    fn test_one_through_five_accepted() {
        let all = [
            "https://a.example/1",
            "https://a.example/2",
            "https://a.example/3",
            "https://a.example/4",
            "https://a.example/5",
        ];
        for n in 1..=5 {
            let urls = validate_urls(&all[..n], 5).unwrap();
            assert_eq!(urls.len(), n);
        }
    }

    #[test]
    fn test_six_rejected() {
        let values = vec!["https://x.example/"; 6];
        let err = validate_urls(values, 5).unwrap_err();
        assert_eq!(err, ValidationError::TooMany { max: 5, count: 6 });
        assert_eq!(err.to_string(), "Maximum 5 URLs allowed");
    }

    #[test]
    fn test_blanks_do_not_count_toward_max() {
        let values = ["a", "", "b", " ", "c", "d", "e", ""];
        let urls = validate_urls(values, 5).unwrap();
        assert_eq!(urls, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_values_kept_untrimmed() {
        // Only the blank check trims; the form submits what the user typed
        let urls = collect_urls([" https://a.example "]);
        assert_eq!(urls, vec![" https://a.example "]);
    }

    #[test]
    fn test_custom_max() {
        assert!(validate_urls(["a", "b"], 1).is_err());
        assert!(validate_urls(["a"], 1).is_ok());
    }
}
