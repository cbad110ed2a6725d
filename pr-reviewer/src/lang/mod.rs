//! Language classification from file extensions.

/// Extension → language table. Ordered; first suffix match wins.
const LANGUAGE_MAP: &[(&str, &str)] = &[
    (".py", "Python"),
    (".js", "JavaScript"),
    (".ts", "TypeScript"),
    (".java", "Java"),
    (".cpp", "C++"),
    (".c", "C"),
    (".cs", "C#"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".php", "PHP"),
    (".rb", "Ruby"),
    (".html", "HTML"),
    (".css", "CSS"),
    (".sql", "SQL"),
];

/// Classification for paths with no mapped extension (or no path at all).
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Detects the programming language of a file from its extension.
///
/// Matching is case-insensitive. Unmapped extensions and empty paths
/// classify as [`UNKNOWN_LANGUAGE`].
pub fn detect_language(file_path: &str) -> &'static str {
    if file_path.is_empty() {
        return UNKNOWN_LANGUAGE;
    }

    let lower = file_path.to_lowercase();
    for (ext, lang) in LANGUAGE_MAP {
        if lower.ends_with(ext) {
            return lang;
        }
    }
    UNKNOWN_LANGUAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(detect_language("app/main.py"), "Python");
        assert_eq!(detect_language("web/index.js"), "JavaScript");
        assert_eq!(detect_language("src/lib.rs"), "Rust");
        assert_eq!(detect_language("schema.sql"), "SQL");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(detect_language("Main.PY"), "Python");
        assert_eq!(detect_language("STYLES.CSS"), "CSS");
    }

    #[test]
    fn unknown_for_unmapped_or_empty() {
        assert_eq!(detect_language("notes.txt"), UNKNOWN_LANGUAGE);
        assert_eq!(detect_language("Makefile"), UNKNOWN_LANGUAGE);
        assert_eq!(detect_language(""), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn c_does_not_shadow_cpp_or_cs() {
        assert_eq!(detect_language("core.cpp"), "C++");
        assert_eq!(detect_language("Program.cs"), "C#");
        assert_eq!(detect_language("kernel.c"), "C");
    }
}
