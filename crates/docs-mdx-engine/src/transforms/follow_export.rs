use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use relative_path::RelativePath;

use crate::io::{FsLoader, SourceLoader};
use crate::models::{Document, Node};

use super::{Transform, TransformError};

/// `export { default } from '../../shared/page.mdx'`
static RE_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^export\s+\{\s*default\s*\}\s+from\s+['"](.+?)['"]\s*;?$"#)
        .expect("export pattern is valid")
});

/// Replaces an alias page (one whose body re-exports another file's default
/// export) with the content of the file it points at, so headings and the
/// table of contents come from the real content.
///
/// Front matter is merged: the target's data first, the alias page's own
/// keys on top.
pub struct FollowExport {
    loader: Box<dyn SourceLoader>,
}

impl Default for FollowExport {
    fn default() -> Self {
        Self::new(FsLoader)
    }
}

impl FollowExport {
    pub fn new(loader: impl SourceLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
        }
    }
}

/// The relative path of the first top-level default re-export, if any.
pub fn export_target(doc: &Document) -> Option<&str> {
    doc.children().iter().find_map(|node| match node {
        Node::MdxjsEsm { value } => RE_EXPORT
            .captures(value)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str()),
        _ => None,
    })
}

/// Resolve `rel` against the directory of `from`, collapsing `.` and `..`
/// lexically.
pub fn resolve_target(from: &Path, rel: &str) -> PathBuf {
    let rel_path = Path::new(rel);
    if rel_path.is_absolute() {
        return rel_path.to_path_buf();
    }
    let base = from.parent().unwrap_or(Path::new(""));
    RelativePath::new(rel).to_logical_path(base)
}

impl Transform for FollowExport {
    fn name(&self) -> &'static str {
        "follow-export"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), TransformError> {
        let Some(rel) = export_target(doc) else {
            return Ok(());
        };
        let target_path = resolve_target(doc.path(), rel);
        log::debug!(
            "{} re-exports {}",
            doc.path().display(),
            target_path.display()
        );

        let source = self
            .loader
            .load(&target_path)
            .map_err(|source| TransformError::ReadExport {
                path: target_path.clone(),
                source,
            })?;
        let target = Document::parse(&target_path, &source).map_err(|source| {
            TransformError::ParseExport {
                path: target_path.clone(),
                source,
            }
        })?;

        let Document { mut root, data, .. } = target;
        doc.replace_children(root.children_mut().map(std::mem::take).unwrap_or_default());
        doc.merge_data_over(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryLoader;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_yaml::Value;

    #[rstest]
    #[case("export { default } from '../../using-revenuecat.mdx'", Some("../../using-revenuecat.mdx"))]
    #[case("export {default} from \"./x.mdx\";", Some("./x.mdx"))]
    #[case("import A from './a'\nexport { default } from './b.mdx'", Some("./b.mdx"))]
    #[case("export { default as Foo } from './x.mdx'", None)]
    #[case("export const meta = {}", None)]
    fn finds_export_target(#[case] esm: &str, #[case] expected: Option<&str>) {
        let doc = Document::new(
            "/docs/a.mdx",
            vec![Node::MdxjsEsm {
                value: esm.to_string(),
            }],
        );
        assert_eq!(export_target(&doc), expected);
    }

    #[test]
    fn export_inside_a_container_is_ignored() {
        let doc = Document::new(
            "/docs/a.mdx",
            vec![Node::paragraph(vec![Node::text(
                "export { default } from './x.mdx'",
            )])],
        );
        assert_eq!(export_target(&doc), None);
    }

    #[rstest]
    #[case("/repo/docs/ios/setup.mdx", "../../shared/setup.mdx", "/repo/shared/setup.mdx")]
    #[case("/repo/docs/ios/setup.mdx", "./partial.mdx", "/repo/docs/ios/partial.mdx")]
    #[case("docs/ios/setup.mdx", "../x.mdx", "docs/x.mdx")]
    #[case("/repo/docs/a.mdx", "/abs/b.mdx", "/abs/b.mdx")]
    fn resolves_against_document_directory(
        #[case] from: &str,
        #[case] rel: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve_target(Path::new(from), rel), PathBuf::from(expected));
    }

    #[test]
    fn replaces_children_and_merges_data() {
        let loader = MemoryLoader::new().with_file(
            "/repo/docs/shared/x.mdx",
            "---\ntitle: Shared title\ndescription: From shared\n---\n\n# Shared\n\nBody",
        );
        let mut doc = Document::parse(
            "/repo/docs/ios/alias.mdx",
            "---\ntitle: Alias title\n---\n\nexport { default } from \"../shared/x.mdx\"\n",
        )
        .unwrap();

        FollowExport::new(loader).apply(&mut doc).unwrap();

        let expected = Document::parse(
            "/repo/docs/shared/x.mdx",
            "---\ntitle: Shared title\ndescription: From shared\n---\n\n# Shared\n\nBody",
        )
        .unwrap();
        assert_eq!(doc.root, expected.root);
        assert_eq!(doc.path(), Path::new("/repo/docs/ios/alias.mdx"));
        assert_eq!(
            doc.data.get("title"),
            Some(&Value::String("Alias title".to_string()))
        );
        assert_eq!(
            doc.data.get("description"),
            Some(&Value::String("From shared".to_string()))
        );
    }

    #[test]
    fn regular_pages_are_untouched() {
        let mut doc = Document::parse("/docs/a.mdx", "# Title\n\nText").unwrap();
        let before = doc.clone();
        FollowExport::new(MemoryLoader::new()).apply(&mut doc).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn missing_target_is_an_error() {
        let mut doc =
            Document::parse("/docs/a.mdx", "export { default } from './gone.mdx'").unwrap();
        let err = FollowExport::new(MemoryLoader::new())
            .apply(&mut doc)
            .unwrap_err();
        assert!(
            matches!(&err, TransformError::ReadExport { path, .. } if path == Path::new("/docs/gone.mdx"))
        );
    }

    #[test]
    fn invalid_target_front_matter_is_an_error() {
        let loader = MemoryLoader::new().with_file("/docs/bad.mdx", "---\n: [\n---\n");
        let mut doc =
            Document::parse("/docs/a.mdx", "export { default } from './bad.mdx'").unwrap();
        let err = FollowExport::new(loader).apply(&mut doc).unwrap_err();
        assert!(matches!(err, TransformError::ParseExport { .. }));
    }
}
