//! Named prompt templates for the review pipeline.
//!
//! A catalog holds `{system_prompt, user_prompt}` pairs keyed by name. The
//! built-in defaults are compiled in; an external JSON file (schema
//! `{ "<name>": { "system_prompt": "...", "user_prompt": "..." } }`) can
//! override the whole set and be reloaded at runtime without restart.
//! Lookups never fail: an unknown name yields a visible placeholder so a
//! misconfigured catalog degrades loudly in output rather than aborting runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Template name for per-file analysis.
pub const FILE_ANALYSIS: &str = "file_analysis";
/// Template name for per-file improvement suggestions.
pub const CODE_IMPROVEMENTS: &str = "code_improvements";
/// Template name for the whole-PR review.
pub const OVERALL_REVIEW: &str = "overall_review";
/// Template name for the short summary.
pub const SUMMARY_GENERATION: &str = "summary_generation";

/// Environment variable pointing at an external prompt file.
pub const PROMPTS_PATH_ENV: &str = "REVIEW_PROMPTS_PATH";

/// One named prompt: a system part and a user part, both with `{key}`
/// placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Catalog of prompt templates with atomic whole-set reload.
pub struct PromptCatalog {
    templates: RwLock<Arc<HashMap<String, PromptTemplate>>>,
    path: Option<PathBuf>,
}

impl PromptCatalog {
    /// Catalog holding only the compiled-in defaults.
    pub fn builtin() -> Self {
        Self {
            templates: RwLock::new(Arc::new(default_templates())),
            path: None,
        }
    }

    /// Catalog backed by an external JSON file.
    ///
    /// A missing or malformed file falls back to the defaults with a
    /// warning; it is not an error.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let templates = match load_templates(&path) {
            Ok(set) => {
                info!(path = %path.display(), count = set.len(), "loaded prompt templates");
                set
            }
            Err(reason) => {
                warn!(path = %path.display(), %reason, "falling back to built-in prompts");
                default_templates()
            }
        };
        Self {
            templates: RwLock::new(Arc::new(templates)),
            path: Some(path),
        }
    }

    /// Catalog from [`PROMPTS_PATH_ENV`] when set, built-in otherwise.
    pub fn from_env() -> Self {
        match std::env::var(PROMPTS_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => Self::builtin(),
        }
    }

    /// Re-reads the backing file and swaps the whole template set.
    ///
    /// On read/parse failure the current set stays in place. A catalog
    /// without a backing file resets to the defaults.
    pub fn reload(&self) {
        let fresh = match &self.path {
            Some(path) => match load_templates(path) {
                Ok(set) => {
                    info!(path = %path.display(), count = set.len(), "reloaded prompt templates");
                    set
                }
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "reload failed, keeping current prompts");
                    return;
                }
            },
            None => default_templates(),
        };
        let mut guard = self.templates.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(fresh);
    }

    /// Looks up a template by name.
    ///
    /// Unknown names yield a placeholder template whose both parts read
    /// `[missing prompt: <name>]`.
    pub fn template(&self, name: &str) -> PromptTemplate {
        let set = self
            .templates
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match set.get(name) {
            Some(t) => t.clone(),
            None => {
                warn!(name, "prompt template not found");
                let placeholder = format!("[missing prompt: {name}]");
                PromptTemplate {
                    system_prompt: placeholder.clone(),
                    user_prompt: placeholder,
                }
            }
        }
    }
}

/// Substitutes `{key}` occurrences in `text` with the paired values.
///
/// Keys without a pairing are left verbatim so broken templates stay
/// visible in model input instead of silently vanishing.
pub fn render(text: &str, vars: &[(&str, &str)]) -> String {
    let mut out = text.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

fn load_templates(path: &Path) -> Result<HashMap<String, PromptTemplate>, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let set: HashMap<String, PromptTemplate> =
        serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    if set.is_empty() {
        return Err("prompt file contains no templates".into());
    }
    Ok(set)
}

fn default_templates() -> HashMap<String, PromptTemplate> {
    let mut set = HashMap::new();

    set.insert(
        FILE_ANALYSIS.to_string(),
        PromptTemplate {
            system_prompt: "You are a senior software architect. Provide comprehensive analysis focusing on:\n\
1. Design Patterns & Architecture\n\
2. Performance Analysis\n\
3. Security Review\n\
4. Maintainability\n\
5. Best Practices\n\n\
Be specific, actionable, and focus on production readiness."
                .to_string(),
            user_prompt: "Analyze this file change:\n\n\
File: {filename}\n\
Language: {language}\n\
Changes: +{additions} -{deletions} lines\n\n\
Diff Analysis:\n{diff}\n\n\
Code Changes Summary:\n{changes_summary}"
                .to_string(),
        },
    );

    set.insert(
        CODE_IMPROVEMENTS.to_string(),
        PromptTemplate {
            system_prompt: "You are an expert code reviewer. Analyze the provided code changes and give specific improvements.\n\n\
TASK: Provide code improvements in this EXACT format:\n\n\
## 🎯 ORIGINAL CODE vs IMPROVED CODE\n\n\
### Issue 1: [Problem Description]\n\
**Severity**: HIGH/MEDIUM/LOW\n\
**Category**: Performance/Security/Quality/Style\n\n\
**Original Code:**\n\
```[language]\n\
[show the actual problematic code]\n\
```\n\n\
**Improved Code:**\n\
```[language]\n\
[show the improved version]\n\
```\n\n\
**Why This Is Better:**\n\
- [Specific technical reason 1]\n\
- [Specific technical reason 2]\n\
- [Measurable benefit]\n\n\
REQUIREMENTS:\n\
- Always find at least 1-2 improvement opportunities\n\
- Be specific about what to change and why\n\
- Provide working code examples\n\
- Focus on practical, implementable suggestions"
                .to_string(),
            user_prompt: "Please analyze this code change:\n\n\
File: {file_path}\n\
Language: {language}\n\n\
Added Lines:\n{added_lines}\n\n\
Removed Lines:\n{removed_lines}\n\n\
Context:\n{context}\n\n\
Provide specific improvements with before/after examples."
                .to_string(),
        },
    );

    set.insert(
        OVERALL_REVIEW.to_string(),
        PromptTemplate {
            system_prompt: "You are a Principal Software Engineer. Provide structured feedback:\n\n\
## 🎯 EXECUTIVE SUMMARY\n\
- Recommendation: APPROVE/REQUEST_CHANGES/COMMENT with reasoning\n\
- Overall Quality Score: X/10 with justification\n\n\
## 📊 DETAILED ANALYSIS\n\
### 🏗️ Architecture & Design\n\
### ⚡ Performance Analysis\n\
### 🔒 Security Review\n\
### 🧹 Code Quality\n\n\
## 🚀 ACTIONABLE RECOMMENDATIONS\n\
## ✅ POSITIVE ASPECTS"
                .to_string(),
            user_prompt: "Review this PR:\n\n\
PR Title: {title}\n\
Description: {description}\n\n\
File Analysis Summary:\n{file_analysis}"
                .to_string(),
        },
    );

    set.insert(
        SUMMARY_GENERATION.to_string(),
        PromptTemplate {
            system_prompt:
                "Create a concise 2-3 sentence summary focusing on key quality and performance aspects."
                    .to_string(),
            user_prompt: "Overall Review: {overall}\n\nFile Count: {file_count}".to_string(),
        },
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_pipeline_stages() {
        let catalog = PromptCatalog::builtin();
        for name in [FILE_ANALYSIS, CODE_IMPROVEMENTS, OVERALL_REVIEW, SUMMARY_GENERATION] {
            let t = catalog.template(name);
            assert!(!t.system_prompt.is_empty(), "{name} system part empty");
            assert!(!t.user_prompt.is_empty(), "{name} user part empty");
            assert!(!t.system_prompt.starts_with("[missing prompt"));
        }
    }

    #[test]
    fn unknown_name_yields_placeholder() {
        let catalog = PromptCatalog::builtin();
        let t = catalog.template("nonexistent");
        assert_eq!(t.system_prompt, "[missing prompt: nonexistent]");
        assert_eq!(t.user_prompt, "[missing prompt: nonexistent]");
    }

    #[test]
    fn render_substitutes_and_keeps_unknown_keys() {
        let out = render(
            "File: {filename} Lang: {language} Raw: {unset}",
            &[("filename", "a.py"), ("language", "Python")],
        );
        assert_eq!(out, "File: a.py Lang: Python Raw: {unset}");
    }

    #[test]
    fn render_substitutes_repeated_keys() {
        let out = render("{x} and {x}", &[("x", "y")]);
        assert_eq!(out, "y and y");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("prompts-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let catalog = PromptCatalog::from_file(&path);
        let t = catalog.template(FILE_ANALYSIS);
        assert!(t.system_prompt.contains("senior software architect"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn file_overrides_and_reload_swaps_the_set() {
        let path = std::env::temp_dir().join(format!("prompts-ok-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"file_analysis": {"system_prompt": "s1", "user_prompt": "u1"}}"#,
        )
        .unwrap();
        let catalog = PromptCatalog::from_file(&path);
        assert_eq!(catalog.template(FILE_ANALYSIS).system_prompt, "s1");
        // Names absent from the file are missing, not defaulted per-name.
        assert!(catalog
            .template(OVERALL_REVIEW)
            .system_prompt
            .starts_with("[missing prompt"));

        std::fs::write(
            &path,
            r#"{"file_analysis": {"system_prompt": "s2", "user_prompt": "u2"}}"#,
        )
        .unwrap();
        catalog.reload();
        assert_eq!(catalog.template(FILE_ANALYSIS).system_prompt, "s2");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn failed_reload_keeps_current_set() {
        let path = std::env::temp_dir().join(format!("prompts-gone-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"file_analysis": {"system_prompt": "keep", "user_prompt": "keep"}}"#,
        )
        .unwrap();
        let catalog = PromptCatalog::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        catalog.reload();
        assert_eq!(catalog.template(FILE_ANALYSIS).system_prompt, "keep");
    }
}
