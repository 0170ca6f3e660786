//! End-to-end model generation.
//!
//! The pipeline runs sequentially over one client:
//!
//! 1. A technical preview session fetches `work_item_root` and its fields.
//! 2. The main session fetches all entity types, lists and phases.
//! 3. Lists and phases are emitted.
//! 4. Every non-excluded entity type gets a model, an interface and, when
//!    exposed over REST, an entity list.
//!
//! Any error aborts the run. Files already written stay in place.

use crate::catalog::{EntityCatalog, is_excluded};
use crate::lists::{ListCatalog, fetch_lists};
use crate::model::{entity_list_context, interface_context, model_context};
use crate::phases::{PhaseCatalog, fetch_phases};
use crate::references::ReferenceResolver;
use crate::template_engine::{
    ENTITY_LIST_TEMPLATE, INTERFACE_TEMPLATE, LIST_TEMPLATE, MODEL_TEMPLATE, PHASES_TEMPLATE,
    TemplateEngine,
};
use crate::types::{ListContext, PhasesContext};
use modelgen_core::traits::{MetadataClient, OutputSink, TemplateRenderer};
use modelgen_core::{
    ApiMode, Credentials, EntityTypeDescriptor, Error, GeneratorConfig, Result, WORK_ITEM_ROOT,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where each artifact lands below the output root.
///
/// # Examples
///
/// ```
/// use modelgen_codegen::OutputLayout;
/// use std::path::Path;
///
/// let layout = OutputLayout::new("com/acme");
/// assert_eq!(
///     layout.model("DefectEntityModel"),
///     Path::new("com/acme/model/DefectEntityModel.java")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    package_dir: PathBuf,
}

impl OutputLayout {
    /// Creates a layout rooted at the package directory.
    #[must_use]
    pub fn new(package_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_dir: package_dir.into(),
        }
    }

    /// Path of a model class or interface.
    #[must_use]
    pub fn model(&self, class_name: &str) -> PathBuf {
        self.java_file("model", class_name)
    }

    /// Path of an entity list class.
    #[must_use]
    pub fn entity_list(&self, class_name: &str) -> PathBuf {
        self.java_file("entities", class_name)
    }

    /// Path of a list enumeration.
    #[must_use]
    pub fn list(&self, identifier: &str) -> PathBuf {
        self.java_file("enums/lists", identifier)
    }

    /// Path of the phases class.
    #[must_use]
    pub fn phases(&self) -> PathBuf {
        self.java_file("enums", "Phases")
    }

    fn java_file(&self, directory: &str, class_name: &str) -> PathBuf {
        self.package_dir
            .join(directory)
            .join(format!("{class_name}.java"))
    }
}

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// List enumerations written
    pub lists: usize,
    /// Phase enumerations written
    pub phase_groups: usize,
    /// Entity types that received models
    pub entities: Vec<String>,
    /// Entity types excluded from generation
    pub skipped: Vec<String>,
    /// Files written, relative to the output root
    pub files: Vec<PathBuf>,
}

/// Drives the whole pipeline and writes the artifacts to a sink.
#[derive(Debug)]
pub struct ModelGenerator<R = TemplateEngine<'static>> {
    renderer: R,
    package: String,
    layout: OutputLayout,
    ignored_list_ids: BTreeSet<String>,
    api_mode: ApiMode,
}

impl ModelGenerator {
    /// Creates a generator with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a built-in template fails to
    /// parse.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        Ok(Self::with_renderer(config, TemplateEngine::new()?))
    }
}

impl<R: TemplateRenderer> ModelGenerator<R> {
    /// Creates a generator with a custom renderer.
    #[must_use]
    pub fn with_renderer(config: &GeneratorConfig, renderer: R) -> Self {
        Self {
            renderer,
            package: config.package.clone(),
            layout: OutputLayout::new(config.package_path()),
            ignored_list_ids: config.ignored_list_ids.clone(),
            api_mode: config.api_mode,
        }
    }

    /// Output layout used for artifact paths.
    #[must_use]
    pub const fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first network, metadata, template or I/O error. There is
    /// no partial-success mode.
    pub async fn generate<C, S>(
        &self,
        client: &mut C,
        credentials: &Credentials,
        sink: &mut S,
    ) -> Result<GenerationReport>
    where
        C: MetadataClient + ?Sized,
        S: OutputSink + ?Sized,
    {
        let work_item_root = Self::fetch_work_item_root(client, credentials).await?;

        info!("Signing in ({} mode)", self.api_mode);
        client.authenticate(credentials, self.api_mode).await?;

        let report = self.generate_in_session(client, work_item_root, sink).await?;

        if let Err(e) = client.sign_out().await {
            warn!("Sign out failed: {e}");
        }
        info!(
            "Generated {} entity types, {} lists, {} phase groups ({} files)",
            report.entities.len(),
            report.lists,
            report.phase_groups,
            report.files.len()
        );
        Ok(report)
    }

    async fn fetch_work_item_root<C>(
        client: &mut C,
        credentials: &Credentials,
    ) -> Result<EntityTypeDescriptor>
    where
        C: MetadataClient + ?Sized,
    {
        info!("Fetching {WORK_ITEM_ROOT} in technical preview mode");
        client
            .authenticate(credentials, ApiMode::TechnicalPreview)
            .await?;
        let descriptor = client.entity_type(WORK_ITEM_ROOT).await?;
        let fields = client.fields(WORK_ITEM_ROOT).await?;
        if let Err(e) = client.sign_out().await {
            warn!("Sign out of technical preview session failed: {e}");
        }
        Ok(descriptor.with_fields(fields))
    }

    async fn generate_in_session<C, S>(
        &self,
        client: &mut C,
        work_item_root: EntityTypeDescriptor,
        sink: &mut S,
    ) -> Result<GenerationReport>
    where
        C: MetadataClient + ?Sized,
        S: OutputSink + ?Sized,
    {
        let mut descriptors = client.entity_types().await?;
        descriptors.retain(|entity| entity.name.as_str() != WORK_ITEM_ROOT);
        descriptors.push(work_item_root);
        let catalog = EntityCatalog::new(descriptors);
        info!("Fetched {} entity types", catalog.len());

        let lists = fetch_lists(&*client, &self.ignored_list_ids).await?;
        let phases = fetch_phases(&*client).await?;

        let mut report = GenerationReport::default();
        self.emit_lists(&lists, sink, &mut report)?;
        self.emit_phases(&phases, sink, &mut report)?;

        let phase_keys = phases.keys();
        let resolver = ReferenceResolver::new(&catalog, lists.logical_names(), &phase_keys);

        for entity in catalog.entities() {
            let name = entity.name.as_str();
            if is_excluded(name) {
                debug!("Skipping excluded entity type {name}");
                report.skipped.push(name.to_string());
                continue;
            }

            let entity = if name == WORK_ITEM_ROOT {
                entity.clone()
            } else {
                entity.clone().with_fields(client.fields(name).await?)
            };
            self.emit_entity(&entity, &catalog, &resolver, sink, &mut report)?;
            report.entities.push(name.to_string());
        }

        Ok(report)
    }

    fn emit_lists<S>(&self, lists: &ListCatalog, sink: &mut S, report: &mut GenerationReport) -> Result<()>
    where
        S: OutputSink + ?Sized,
    {
        for list in lists.lists() {
            let context = ListContext::new(&self.package, list);
            self.write(LIST_TEMPLATE, &context, &self.layout.list(&list.identifier), sink, report)?;
        }
        report.lists = lists.len();
        Ok(())
    }

    fn emit_phases<S>(&self, phases: &PhaseCatalog, sink: &mut S, report: &mut GenerationReport) -> Result<()>
    where
        S: OutputSink + ?Sized,
    {
        let groups = phases.groups();
        let context = PhasesContext::new(&self.package, &groups);
        self.write(PHASES_TEMPLATE, &context, &self.layout.phases(), sink, report)?;
        report.phase_groups = groups.len();
        Ok(())
    }

    fn emit_entity<S>(
        &self,
        entity: &EntityTypeDescriptor,
        catalog: &EntityCatalog,
        resolver: &ReferenceResolver<'_>,
        sink: &mut S,
        report: &mut GenerationReport,
    ) -> Result<()>
    where
        S: OutputSink + ?Sized,
    {
        let model = model_context(&self.package, entity, resolver)?;
        self.write(MODEL_TEMPLATE, &model, &self.layout.model(&model.class_name), sink, report)?;

        let interface = interface_context(&self.package, entity, catalog);
        let path = self.layout.model(&interface.interface_name);
        self.write(INTERFACE_TEMPLATE, &interface, &path, sink, report)?;

        match entity_list_context(&self.package, entity) {
            Some(list) => {
                let path = self.layout.entity_list(&list.class_name);
                self.write(ENTITY_LIST_TEMPLATE, &list, &path, sink, report)?;
            }
            None => warn!(
                "Entity type {} has no REST feature, skipping entity list",
                entity.name
            ),
        }
        Ok(())
    }

    fn write<T, S>(
        &self,
        template: &str,
        context: &T,
        path: &Path,
        sink: &mut S,
        report: &mut GenerationReport,
    ) -> Result<()>
    where
        T: Serialize,
        S: OutputSink + ?Sized,
    {
        let context = serde_json::to_value(context).map_err(|e| Error::SerializationError {
            message: format!("failed to serialize context for template '{template}'"),
            source: Some(e),
        })?;
        let source = self.renderer.render(template, &context)?;
        sink.write_file(path, &source)?;
        info!("Created {}", path.display());
        report.files.push(path.to_path_buf());
        Ok(())
    }
}
