/// Maps the string form of a boolean field to a CMS boolean: only the exact string `"true"` is
/// true, everything else (including `"True"` and `"1"`) is false
pub fn to_cms_bool(value: &str) -> bool {
    value == "true"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lower_true("true", true)]
    #[case::lower_false("false", false)]
    #[case::capitalized("True", false)]
    #[case::numeric("1", false)]
    #[case::padded(" true", false)]
    #[case::empty("", false)]
    fn coerces_strings(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(to_cms_bool(input), expected)
    }
}
