//! Script-listing probes.
//!
//! Composer prints one script per line followed by its description
//! (`  lint   Runs the linter`). npm prints each script name alone on a line
//! with its command indented on the next one. Matching is anchored to whole
//! lines so `linting` never satisfies a probe for `lint`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    /// Name, whitespace, then more text on the same line.
    TwoColumn,
    /// Name is the entire trimmed line.
    OneColumn,
}

/// Returns true if `listing` defines a script called `name`.
pub fn defines_script(listing: &str, name: &str, format: ListingFormat) -> bool {
    match format {
        ListingFormat::TwoColumn => listing.lines().any(|line| {
            line.trim_start().strip_prefix(name).is_some_and(|rest| {
                rest.starts_with(char::is_whitespace) && !rest.trim().is_empty()
            })
        }),
        ListingFormat::OneColumn => listing.lines().any(|line| line.trim() == name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPOSER_LIST: &str = "\
scripts:
  lint          Runs the linter
  lint:fix      Fixes lint issues
  test          Runs the test suite
";

    const NPM_LIST: &str = "\
Lifecycle scripts included in app@1.0.0:
  test
    jest
available via `npm run-script`:
  lint
    eslint .
  test:unit
    jest unit
";

    #[test]
    fn two_column_matches_name_with_description() {
        assert!(defines_script(
            "lint          Runs the linter",
            "lint",
            ListingFormat::TwoColumn
        ));
        assert!(defines_script(COMPOSER_LIST, "lint:fix", ListingFormat::TwoColumn));
    }

    #[test]
    fn two_column_rejects_prefix_of_longer_name() {
        assert!(!defines_script(
            "linting       Something else",
            "lint",
            ListingFormat::TwoColumn
        ));
    }

    #[test]
    fn two_column_requires_description_on_same_line() {
        assert!(!defines_script("lint\nRuns the linter", "lint", ListingFormat::TwoColumn));
    }

    #[test]
    fn two_column_treats_name_literally() {
        assert!(!defines_script("lintXfix      Other", "lint.fix", ListingFormat::TwoColumn));
        assert!(!defines_script("lint:fix   ", "lint:fix", ListingFormat::TwoColumn));
        assert!(defines_script("\tlint:fix\tFixes", "lint:fix", ListingFormat::TwoColumn));
    }

    #[test]
    fn one_column_matches_whole_trimmed_line() {
        assert!(defines_script("test", "test", ListingFormat::OneColumn));
        assert!(defines_script("  test   \r\n", "test", ListingFormat::OneColumn));
        assert!(defines_script(NPM_LIST, "lint", ListingFormat::OneColumn));
    }

    #[test]
    fn one_column_rejects_longer_names() {
        assert!(!defines_script("test:unit", "test", ListingFormat::OneColumn));
        assert!(!defines_script(NPM_LIST, "lint:fix", ListingFormat::OneColumn));
    }
}
