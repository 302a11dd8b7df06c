use once_cell::sync::Lazy;
use regex::Regex;

/// Clean layout artifacts from a raw extracted line.
///
/// - any ASCII letter repeated three or more times in a row collapses to one
///   (`"Wwwwooorrr"` → `"Wwor"`; the run must be the same character, case included)
/// - runs of two or more whitespace characters become one space
/// - leading and trailing whitespace is removed
///
/// Total and idempotent.
pub fn normalize_line(raw: &str) -> String {
    static MULTI_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

    let squashed = squash_letter_runs(raw);
    MULTI_WS_RE.replace_all(&squashed, " ").trim().to_string()
}

fn squash_letter_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.next_if_eq(&c).is_some() {
            run += 1;
        }
        if c.is_ascii_alphabetic() && run >= 3 {
            out.push(c);
        } else {
            out.extend(std::iter::repeat_n(c, run));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_letter_runs() {
        assert_eq!(normalize_line("Wwwwooorrrllddd"), "Wworlld");
        assert_eq!(normalize_line("HHHEEERRRIIITTTAAAGGGEEE"), "HERITAGE");
        assert_eq!(normalize_line("Tallinn"), "Tallinn");
    }

    #[test]
    fn keeps_digit_and_punctuation_runs() {
        assert_eq!(normalize_line("1111 ..."), "1111 ...");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize_line("  Old   Town\t\tof  Lijiang  "), "Old Town of Lijiang");
        assert_eq!(normalize_line("a\tb"), "a\tb");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize_line(""), "");
        assert_eq!(normalize_line("   \t "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Wwwwooorrrllddd   Heritage",
            "  GGGGERMANY ",
            "Aaa  bbb\t\tccc",
            "Historic Centre 660 1987",
            "C (i)(ii)(iii)",
            "aaaa a aaa",
            "ÉÉÉcole",
            "",
        ];
        for s in samples {
            let once = normalize_line(s);
            assert_eq!(normalize_line(&once), once, "not idempotent for {s:?}");
        }
    }
}
