/// Trim code that fits on a single line
///
/// Formatters like to pad one-liners embedded in markup. Multi-line code is
/// returned untouched since its indentation is significant.
pub fn clean(code: &str) -> String {
    if code.is_empty() || code.contains(['\r', '\n']) {
        code.to_string()
    } else {
        code.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::clean;

    #[test]
    fn test_single_line_trimmed() {
        assert_eq!(clean("  x = 1  "), "x = 1");
        assert_eq!(clean("\tprint('hi')\t"), "print('hi')");
    }

    #[test]
    fn test_multi_line_untouched() {
        let code = "  def f():\n      return 1\n";
        assert_eq!(clean(code), code);
        assert_eq!(clean(" a \r b "), " a \r b ");
    }

    #[test]
    fn test_empty() {
        assert_eq!(clean(""), "");
    }
}
