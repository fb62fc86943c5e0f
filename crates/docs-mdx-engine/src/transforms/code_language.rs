use crate::models::{Document, Node, NodeKind};
use crate::visit::{Action, visit_mut};

use super::{Transform, TransformError};

const GRADLE: &str = "gradle";
const GROOVY: &str = "groovy";

/// Lowercases code block languages and maps `gradle` to `groovy`, the
/// highlighter grammar that covers it. The original name survives as the
/// block's `meta` label unless it already has one.
pub struct CodeLanguage;

impl Transform for CodeLanguage {
    fn name(&self) -> &'static str {
        "code-language"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        visit_mut(&mut doc.root, NodeKind::Code, |node, _| {
            if let Node::Code { lang, meta, .. } = node
                && let Some(lang) = lang.as_mut().filter(|l| !l.is_empty())
            {
                let lowered = lang.to_lowercase();
                if lowered == GRADLE {
                    *lang = GROOVY.to_string();
                    if meta.as_deref().is_none_or(str::is_empty) {
                        *meta = Some(GRADLE.to_string());
                    }
                } else {
                    *lang = lowered;
                }
            }
            Action::Continue
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn run(node: Node) -> Node {
        let mut doc = Document::new("/docs/a.mdx", vec![node]);
        CodeLanguage.apply(&mut doc).unwrap();
        doc.children()[0].clone()
    }

    #[rstest]
    #[case(Some("gradle"), None, Some("groovy"), Some("gradle"))]
    #[case(Some("Gradle"), Some(""), Some("groovy"), Some("gradle"))]
    #[case(Some("GRADLE"), Some("build.gradle"), Some("groovy"), Some("build.gradle"))]
    #[case(Some("Swift"), None, Some("swift"), None)]
    #[case(Some("KOTLIN"), Some("Kotlin"), Some("kotlin"), Some("Kotlin"))]
    #[case(None, Some("Example"), None, Some("Example"))]
    #[case(Some(""), None, Some(""), None)]
    fn normalizes(
        #[case] lang: Option<&str>,
        #[case] meta: Option<&str>,
        #[case] want_lang: Option<&str>,
        #[case] want_meta: Option<&str>,
    ) {
        assert_eq!(
            run(Node::code(lang, meta, "x")),
            Node::code(want_lang, want_meta, "x")
        );
    }
}
