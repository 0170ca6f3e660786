//! End-to-end generation against an in-memory Octane workspace.

use async_trait::async_trait;
use modelgen_codegen::{FileSystemSink, MemorySink, ModelGenerator};
use modelgen_core::traits::MetadataClient;
use modelgen_core::{
    ApiMode, Credentials, EntityRecord, EntityTypeDescriptor, Error, Feature, FieldDescriptor,
    FieldType, GeneratorConfig, QueryRequest, ReferenceTarget, Result, WORK_ITEM_ROOT,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tempfile::TempDir;

#[derive(Debug, Default)]
struct FakeOctane {
    entities: Vec<EntityTypeDescriptor>,
    fields: BTreeMap<String, Vec<FieldDescriptor>>,
    list_roots: Vec<Value>,
    list_values: BTreeMap<String, Vec<Value>>,
    phases: Vec<Value>,
    sessions: Vec<ApiMode>,
    sign_outs: usize,
    active: Option<ApiMode>,
}

impl FakeOctane {
    fn require_session(&self, endpoint: &str) -> Result<ApiMode> {
        self.active.ok_or_else(|| Error::ApiError {
            endpoint: endpoint.to_string(),
            status: 401,
            message: "not signed in".to_string(),
        })
    }
}

#[async_trait]
impl MetadataClient for FakeOctane {
    async fn authenticate(&mut self, _credentials: &Credentials, mode: ApiMode) -> Result<()> {
        self.sessions.push(mode);
        self.active = Some(mode);
        Ok(())
    }

    async fn sign_out(&mut self) -> Result<()> {
        self.active = None;
        self.sign_outs += 1;
        Ok(())
    }

    async fn entity_types(&self) -> Result<Vec<EntityTypeDescriptor>> {
        self.require_session("metadata/entities")?;
        Ok(self
            .entities
            .iter()
            .filter(|entity| entity.name.as_str() != WORK_ITEM_ROOT)
            .cloned()
            .collect())
    }

    async fn entity_type(&self, name: &str) -> Result<EntityTypeDescriptor> {
        let mode = self.require_session("metadata/entities")?;
        if name == WORK_ITEM_ROOT && !mode.is_technical_preview() {
            return Err(Error::ResourceNotFound {
                resource: name.to_string(),
            });
        }
        self.entities
            .iter()
            .find(|entity| entity.name.as_str() == name)
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound {
                resource: name.to_string(),
            })
    }

    async fn fields(&self, entity: &str) -> Result<Vec<FieldDescriptor>> {
        self.require_session("metadata/fields")?;
        Ok(self.fields.get(entity).cloned().unwrap_or_default())
    }

    async fn query(&self, collection: &str, request: &QueryRequest) -> Result<Vec<EntityRecord>> {
        self.require_session(collection)?;
        let filter = request
            .filter
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let records: Vec<Value> = match collection {
            "list_nodes" if filter.contains("list_root EQ null") => self.list_roots.clone(),
            "list_nodes" => self
                .list_values
                .iter()
                .find(|(root, _)| filter.contains(&format!("{{id EQ '{root}'}}")))
                .map(|(_, values)| values.clone())
                .unwrap_or_default(),
            "phases" => self.phases.clone(),
            other => panic!("unexpected collection {other}"),
        };
        records.into_iter().map(EntityRecord::from_value).collect()
    }
}

fn rest(url: &str, methods: &[&str]) -> Feature {
    Feature::Rest {
        url: url.to_string(),
        methods: methods.iter().map(|m| (*m).to_string()).collect(),
    }
}

fn subtype_of(parent: &str) -> Feature {
    Feature::SubtypeOf {
        parent: parent.to_string(),
    }
}

fn list_value(id: &str, name: &str, root: &str, level: i64) -> Value {
    json!({
        "type": "list_node",
        "id": id,
        "name": name,
        "activity_level": level,
        "list_root": {"type": "list_node", "id": root},
    })
}

fn phase(id: &str, name: &str, entity: &str) -> Value {
    json!({"type": "phase", "id": id, "name": name, "entity": entity})
}

fn workspace() -> FakeOctane {
    let entities = vec![
        EntityTypeDescriptor::new("work_item")
            .with_feature(rest("work_items", &["GET"]))
            .with_feature(Feature::Subtypes {
                types: vec!["story".to_string(), "defect".to_string()],
            }),
        EntityTypeDescriptor::new("story")
            .with_feature(rest("stories", &["GET", "POST", "PUT", "DELETE"]))
            .with_feature(subtype_of("work_item")),
        EntityTypeDescriptor::new("defect")
            .with_feature(rest("defects", &["GET", "POST", "PUT", "DELETE"]))
            .with_feature(subtype_of("work_item")),
        EntityTypeDescriptor::new("team").with_feature(rest("teams", &["GET"])),
        EntityTypeDescriptor::new("release"),
        EntityTypeDescriptor::new("audit").with_feature(rest("audits", &["GET"])),
        EntityTypeDescriptor::new("log_entry"),
        EntityTypeDescriptor::new(WORK_ITEM_ROOT).with_feature(rest("work_item_roots", &["GET"])),
    ];

    let phase_field = || {
        FieldDescriptor::reference("phase", false, vec![ReferenceTarget::entity("phase")]).required()
    };
    let name_field = || FieldDescriptor::new("name", FieldType::String).required().sortable();

    let fields = BTreeMap::from([
        (
            "story".to_string(),
            vec![
                name_field(),
                phase_field(),
                FieldDescriptor::reference("parent", false, vec![ReferenceTarget::entity("work_item")])
                    .required(),
            ],
        ),
        (
            "defect".to_string(),
            vec![
                name_field(),
                phase_field(),
                FieldDescriptor::reference("severity", false, vec![ReferenceTarget::list("list_node.severity")])
                    .required(),
                FieldDescriptor::reference(
                    "owner",
                    false,
                    vec![ReferenceTarget::entity("team"), ReferenceTarget::entity("audit")],
                ),
                FieldDescriptor::reference("detected_in_releases", true, vec![ReferenceTarget::entity("release")]),
            ],
        ),
        ("team".to_string(), vec![name_field()]),
        ("release".to_string(), vec![FieldDescriptor::new("end_date", FieldType::Date)]),
        (WORK_ITEM_ROOT.to_string(), vec![FieldDescriptor::new("name", FieldType::String)]),
    ]);

    FakeOctane {
        entities,
        fields,
        list_roots: vec![
            json!({"type": "list_node", "id": "1000", "name": "Severity", "logical_name": "list_node.severity", "activity_level": 0}),
            json!({"type": "list_node", "id": "2000", "name": "Priority", "logical_name": "list_node.priority", "activity_level": 0}),
        ],
        list_values: BTreeMap::from([
            (
                "1000".to_string(),
                vec![
                    list_value("1001", "High", "1000", 0),
                    list_value("1002", "Low", "1000", 1),
                    list_value("1003", "Gone", "1000", 2),
                    list_value("1005", "N|A", "1000", 0),
                    list_value("1004", "N/A", "1000", 0),
                ],
            ),
            ("2000".to_string(), vec![list_value("2001", "Urgent", "2000", 0)]),
        ]),
        phases: vec![
            phase("phase.defect.new", "New", "defect"),
            phase("phase.defect.opened", "Opened", "defect"),
            phase("phase.story.new", "New", "story"),
            phase("phase.story.done", "Done", "story"),
        ],
        ..FakeOctane::default()
    }
}

fn config() -> GeneratorConfig {
    GeneratorConfig::builder()
        .server("https://octane.example.com")
        .shared_space(1001)
        .workspace(1002)
        .client_id("client")
        .client_secret("secret")
        .ignored_list_ids("2000")
        .package("com.acme.octane")
        .build()
        .unwrap()
}

const ROOT: &str = "com/acme/octane";

#[tokio::test]
async fn test_generates_full_model() {
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    let mut sink = MemorySink::new();

    let report = generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap();

    assert_eq!(report.lists, 1);
    assert_eq!(report.phase_groups, 2);
    assert_eq!(report.skipped, ["audit", "log_entry"]);
    assert_eq!(
        report.entities,
        ["defect", "release", "story", "team", "work_item", WORK_ITEM_ROOT]
    );
    assert_eq!(report.files.len(), sink.len());

    for class in [
        "model/DefectEntityModel.java",
        "model/DefectEntity.java",
        "entities/DefectEntityList.java",
        "model/WorkItemRootEntityModel.java",
        "model/ReleaseEntityModel.java",
        "enums/lists/SEVERITY.java",
        "enums/Phases.java",
    ] {
        assert!(sink.get(format!("{ROOT}/{class}")).is_some(), "missing {class}");
    }
    assert!(sink.get(format!("{ROOT}/entities/ReleaseEntityList.java")).is_none());
    assert!(sink.get(format!("{ROOT}/enums/lists/PRIORITY.java")).is_none());
    assert!(sink.paths().all(|path| !path.to_string_lossy().contains("Audit")));
    assert!(sink.paths().all(|path| !path.to_string_lossy().contains("LogEntry")));
}

#[tokio::test]
async fn test_sessions_are_sequential() {
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    let mut sink = MemorySink::new();

    generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap();

    assert_eq!(client.sessions, [ApiMode::TechnicalPreview, ApiMode::Default]);
    assert_eq!(client.sign_outs, 2);
    assert!(client.active.is_none());
}

#[tokio::test]
async fn test_list_enumeration_contents() {
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    let mut sink = MemorySink::new();

    generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap();

    let severity = sink.get(format!("{ROOT}/enums/lists/SEVERITY.java")).unwrap();
    assert!(severity.contains("public enum SEVERITY"));
    assert!(severity.contains(r#"SEVERITY("1000", "Severity")"#));
    assert!(severity.contains(r#"N_A__1("1004", "N/A")"#));
    assert!(severity.contains(r#"N_A__2("1005", "N|A")"#));
    assert!(severity.contains("@Deprecated"));
    assert!(!severity.contains("Gone"));

    let root = severity.find(r#"SEVERITY("1000""#).unwrap();
    let high = severity.find(r#"HIGH("1001""#).unwrap();
    assert!(root < high);
}

#[tokio::test]
async fn test_model_constructors_and_types() {
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    let mut sink = MemorySink::new();

    generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap();

    let story = sink.get(format!("{ROOT}/model/StoryEntityModel.java")).unwrap();
    assert!(story.contains("public class StoryEntityModel extends TypedEntityModel implements StoryEntity"));
    assert!(story.contains(
        "public StoryEntityModel(final String name, final StoryEntityModel parent, final com.acme.octane.enums.Phases.StoryPhase phase)"
    ));
    assert!(story.contains(
        "public StoryEntityModel(final String name, final DefectEntityModel parent, final com.acme.octane.enums.Phases.StoryPhase phase)"
    ));

    let defect = sink.get(format!("{ROOT}/model/DefectEntityModel.java")).unwrap();
    assert!(defect.contains("com.acme.octane.enums.lists.SEVERITY severity"));
    assert!(defect.contains("java.util.Collection<? extends ReleaseEntity> value"));
    assert!(defect.contains("public EntityModel getOwner()"));
    assert!(defect.contains("setOwner(final TeamEntityModel value)"));
    assert!(defect.contains("setOwner(final EntityModel value)"));

    let interface = sink.get(format!("{ROOT}/model/DefectEntity.java")).unwrap();
    assert!(interface.contains("public interface DefectEntity extends WorkItemEntity"));

    let phases = sink.get(format!("{ROOT}/enums/Phases.java")).unwrap();
    assert!(phases.contains("public enum DefectPhase"));
    assert!(phases.contains("public enum StoryPhase"));
    assert!(phases.contains(r#"DONE("phase.story.done", "Done")"#));

    let list = sink.get(format!("{ROOT}/entities/DefectEntityList.java")).unwrap();
    assert!(list.contains("public static final String URL = \"defects\";"));
    assert!(list.contains("public Delete delete()"));
    let team_list = sink.get(format!("{ROOT}/entities/TeamEntityList.java")).unwrap();
    assert!(!team_list.contains("public Create create()"));
}

#[tokio::test]
async fn test_untyped_required_reference_keeps_single_wrapping_constructor() {
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    client
        .entities
        .push(EntityTypeDescriptor::new("comment").with_feature(rest("comments", &["GET"])));
    client.fields.insert(
        "comment".to_string(),
        vec![
            FieldDescriptor::reference("owner_entity", false, vec![ReferenceTarget::entity("audit")])
                .required(),
        ],
    );
    let mut sink = MemorySink::new();

    generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap();

    let comment = sink.get(format!("{ROOT}/model/CommentEntityModel.java")).unwrap();
    let signatures: Vec<&str> = comment
        .lines()
        .filter(|line| line.trim_start().starts_with("public CommentEntityModel(final EntityModel"))
        .collect();
    assert_eq!(signatures.len(), 1);
}

#[tokio::test]
async fn test_unknown_list_aborts_run() {
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    client.fields.insert(
        "team".to_string(),
        vec![FieldDescriptor::reference(
            "size",
            false,
            vec![ReferenceTarget::list("list_node.team_size")],
        )],
    );
    let mut sink = MemorySink::new();

    let err = generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap_err();

    assert!(err.is_metadata_error());
    assert!(err.to_string().contains("list_node.team_size"));
}

#[tokio::test]
async fn test_required_field_without_candidates_fails() {
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    client.fields.insert(
        "release".to_string(),
        vec![FieldDescriptor::new("owner", FieldType::Reference).required()],
    );
    let mut sink = MemorySink::new();

    let err = generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap_err();
    assert!(err.is_metadata_error());
    assert!(err.to_string().contains("release.owner"));
}

#[tokio::test]
async fn test_writes_to_filesystem() {
    let temp_dir = TempDir::new().unwrap();
    let config = config();
    let generator = ModelGenerator::new(&config).unwrap();
    let mut client = workspace();
    let mut sink = FileSystemSink::new(temp_dir.path());

    let report = generator
        .generate(&mut client, &config.credentials, &mut sink)
        .await
        .unwrap();

    for file in &report.files {
        assert!(temp_dir.path().join(file).is_file(), "{}", file.display());
    }
    let phases = std::fs::read_to_string(temp_dir.path().join(ROOT).join("enums/Phases.java")).unwrap();
    assert!(phases.starts_with("package com.acme.octane.enums;"));
}
