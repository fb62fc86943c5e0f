use std::path::{Path, PathBuf};

use docs_mdx_engine::transforms::{
    CodeGroupToTabs, CodeLanguage, FollowExport, ImagePaths, SdkFilter, TabsSyntax, Transform,
};
use docs_mdx_engine::{
    Document, MemoryLoader, Node, NodeKind, Pipeline, PipelineOptions, Sdk, document_to_mdx,
    visit_mut, Action,
};
use pretty_assertions::assert_eq;

const SHARED: &str = include_str!("fixtures/docs/shared/purchases.mdx");
const EXPO_ALIAS: &str = include_str!("fixtures/docs/expo/purchases.mdx");

const ALIAS_PATH: &str = "docs/expo/purchases.mdx";
const SHARED_PATH: &str = "docs/shared/purchases.mdx";

fn loader() -> MemoryLoader {
    MemoryLoader::new().with_file(SHARED_PATH, SHARED)
}

fn directive_names(doc: &Document) -> Vec<String> {
    let mut root = doc.root.clone();
    let mut names = vec![];
    visit_mut(
        &mut root,
        &[
            NodeKind::ContainerDirective,
            NodeKind::LeafDirective,
            NodeKind::TextDirective,
        ][..],
        |node, _| {
            if let Some(directive) = node.as_directive() {
                names.push(directive.name.clone());
            }
            Action::Continue
        },
    );
    names
}

#[test]
fn expo_alias_page_end_to_end() {
    let pipeline = Pipeline::with_loader(PipelineOptions::default(), loader());
    let doc = pipeline
        .process(Path::new(ALIAS_PATH), EXPO_ALIAS)
        .unwrap();

    insta::assert_snapshot!(document_to_mdx(&doc), @r#"
    ---
    title: Purchases in Expo
    description: Shared purchase guide
    sidebar_position: 2
    ---

    # Making purchases

    ![Paywall](../../images/paywall.png)

    :::expo
    Call `Purchases.purchasePackage` from JavaScript.
    :::

    <Tabs items={["gradle","Kotlin"]} groupId="language" persist>

    <Tab value="gradle">

    ```groovy gradle
    implementation 'com.revenuecat.purchases:purchases:8.0.0'
    ```

    </Tab>

    <Tab value="Kotlin">

    ```kotlin Kotlin
    Purchases.sharedInstance.purchase(params)
    ```

    </Tab>

    </Tabs>

    <Tabs items={["Expo","Unknown"]}>

    <Tab value="Expo">

    Use the hook.

    </Tab>

    <Tab value="Unknown">

    No title here.

    </Tab>

    </Tabs>
    "#);
}

#[test]
fn export_resolution_happens_before_sdk_filtering() {
    let pipeline = Pipeline::with_loader(PipelineOptions::default(), loader());
    let through_pipeline = pipeline
        .process(Path::new(ALIAS_PATH), EXPO_ALIAS)
        .unwrap();

    let mut manual = Document::parse(ALIAS_PATH, EXPO_ALIAS).unwrap();
    let stages: Vec<Box<dyn Transform>> = vec![
        Box::new(ImagePaths),
        Box::new(FollowExport::new(loader())),
        Box::new(SdkFilter::default()),
        Box::new(TabsSyntax),
        Box::new(CodeLanguage),
        Box::new(CodeGroupToTabs),
    ];
    for stage in &stages {
        stage.apply(&mut manual).unwrap();
    }

    assert_eq!(through_pipeline, manual);
    assert_eq!(directive_names(&through_pipeline), vec!["expo"]);

    // Filtering first would see only the alias stub and let other SDKs through.
    let mut filtered_first = Document::parse(ALIAS_PATH, EXPO_ALIAS).unwrap();
    SdkFilter::default().apply(&mut filtered_first).unwrap();
    FollowExport::new(loader())
        .apply(&mut filtered_first)
        .unwrap();
    assert_eq!(
        directive_names(&filtered_first),
        vec!["ios", "expo", "android"]
    );
}

#[test]
fn explicit_sdk_wins_over_path() {
    let pipeline = Pipeline::with_loader(
        PipelineOptions {
            sdk: Some(Sdk::Ios),
            sdk_content: None,
        },
        loader(),
    );
    let doc = pipeline
        .process(Path::new(ALIAS_PATH), EXPO_ALIAS)
        .unwrap();
    assert_eq!(directive_names(&doc), vec!["ios"]);
}

#[test]
fn pages_outside_sdk_sections_keep_every_sdk() {
    let pipeline = Pipeline::with_loader(PipelineOptions::default(), MemoryLoader::new());
    let doc = pipeline
        .process(Path::new(SHARED_PATH), SHARED)
        .unwrap();
    assert_eq!(directive_names(&doc), vec!["ios", "expo", "android"]);

    // Images on the page itself are normalized.
    let Node::Paragraph { children } = &doc.children()[2] else {
        panic!("expected the image paragraph");
    };
    assert_eq!(children, &vec![Node::Image {
        url: "/images/paywall.png".to_string(),
        alt: "Paywall".to_string(),
        title: None,
    }]);
}

#[test]
fn reads_exported_files_from_disk() {
    let content = tempfile::tempdir().unwrap();
    let alias: PathBuf = content.path().join("docs/expo/purchases.mdx");
    let shared = content.path().join("docs/shared/purchases.mdx");
    std::fs::create_dir_all(alias.parent().unwrap()).unwrap();
    std::fs::create_dir_all(shared.parent().unwrap()).unwrap();
    std::fs::write(&alias, EXPO_ALIAS).unwrap();
    std::fs::write(&shared, SHARED).unwrap();

    let doc = Pipeline::new(PipelineOptions {
        sdk: Some(Sdk::Expo),
        sdk_content: None,
    })
    .process(&alias, EXPO_ALIAS)
    .unwrap();

    assert_eq!(doc.path(), alias.as_path());
    assert!(document_to_mdx(&doc).contains("# Making purchases"));
    assert_eq!(directive_names(&doc), vec!["expo"]);
}

#[test]
fn sdk_content_blocks_resolve_for_text_exports() {
    let source = "<SDKContent only=\"ios,android\">\n\nNative only.\n\n</SDKContent>\n\n<SDKContent only={[\"expo\"]}>\n\nExpo only.\n\n</SDKContent>\n";
    let pipeline = Pipeline::with_loader(
        PipelineOptions {
            sdk: None,
            sdk_content: Some("expo".to_string()),
        },
        MemoryLoader::new(),
    );
    let doc = pipeline.process(Path::new("llms/expo.mdx"), source).unwrap();
    assert_eq!(document_to_mdx(&doc), "Expo only.\n");
}
