//! In-memory session: the loaded and cleaned tables of one interactive user.
//!
//! A [`Session`] owns its [`NamedTableSet`]s; nothing is shared between sessions. Each stage
//! reads the tables it needs and stores a fresh derived table under the same source
//! identifier, replacing (never merging with) earlier results.
//!
//! The `*_all` helpers process independent files in parallel with `rayon` and return one
//! result per file, keyed by source identifier, so one bad file never aborts the others.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{SweepError, SweepResult};
use crate::export::{ExportArtifact, export_artifact};
use crate::format::ExportFormat;
use crate::ingestion::{LoadOptions, load_named};
use crate::observability::{PipelineObserver, Severity, Stage, StageContext, StageStats, report};
use crate::processing::{ChangeSummary, CleaningSpec, ColumnSelection, clean, project, resolve_columns};
use crate::types::{NamedTableSet, Table};

/// Options shared by every stage a [`Session`] runs.
#[derive(Clone)]
pub struct SessionOptions {
    /// Loader options.
    pub load: LoadOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("load", &self.load)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

impl SessionOptions {
    fn observe<T>(
        &self,
        source: &str,
        stage: Stage,
        result: &SweepResult<T>,
        stats: impl FnOnce(&T) -> StageStats,
    ) {
        let ctx = StageContext {
            source: source.to_string(),
            stage,
        };
        report(self.observer.as_ref(), self.alert_at_or_above, &ctx, result, stats);
    }
}

fn table_stats(t: &Table) -> StageStats {
    StageStats {
        rows: t.row_count(),
        columns: t.column_count(),
    }
}

/// Everything produced for one file by [`sweep_file`].
#[derive(Debug, Clone)]
pub struct SweepOutput {
    /// Table as loaded.
    pub loaded: Table,
    /// Table after cleaning.
    pub cleaned: Table,
    /// What cleaning changed.
    pub summary: ChangeSummary,
    /// Validated (possibly defaulted) column selection.
    pub columns: Vec<String>,
    /// Exported bytes and download metadata.
    pub artifact: ExportArtifact,
}

/// Run load → clean → project → export for one uploaded file.
pub fn sweep_file<S: AsRef<str>>(
    name: &str,
    bytes: &[u8],
    spec: &CleaningSpec,
    columns: &[S],
    format: ExportFormat,
    options: &SessionOptions,
) -> SweepResult<SweepOutput> {
    let loaded = load_named(name, bytes, &options.load);
    options.observe(name, Stage::Load, &loaded, table_stats);
    let loaded = loaded?;

    let (cleaned, summary) = clean(&loaded, spec);
    options.observe(name, Stage::Clean, &Ok(&cleaned), |t| table_stats(t));

    let projected = project(&cleaned, columns);
    options.observe(name, Stage::Project, &projected, table_stats);
    let projected = projected?;

    let artifact = export_artifact(name, &projected, format);
    options.observe(name, Stage::Export, &artifact, |_| table_stats(&projected));

    Ok(SweepOutput {
        columns: projected.column_names(),
        loaded,
        cleaned,
        summary,
        artifact: artifact?,
    })
}

/// Per-user pipeline state.
#[derive(Debug, Default)]
pub struct Session {
    options: SessionOptions,
    loaded: NamedTableSet,
    cleaned: NamedTableSet,
    summaries: BTreeMap<String, ChangeSummary>,
    selections: ColumnSelection,
}

impl Session {
    /// Create an empty session.
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Tables as loaded, for previews.
    pub fn loaded(&self) -> &NamedTableSet {
        &self.loaded
    }

    /// Cleaned tables. A source that was never cleaned has no entry.
    pub fn cleaned(&self) -> &NamedTableSet {
        &self.cleaned
    }

    /// The latest table for `name`: cleaned if available, otherwise as loaded.
    pub fn current(&self, name: &str) -> SweepResult<&Table> {
        self.cleaned
            .get(name)
            .or_else(|| self.loaded.get(name))
            .ok_or_else(|| SweepError::UnknownSource {
                name: name.to_string(),
            })
    }

    /// Change summary of the latest cleaning of `name`.
    pub fn summary(&self, name: &str) -> Option<&ChangeSummary> {
        self.summaries.get(name)
    }

    /// Validated column selection for `name`, if one was made.
    pub fn selection(&self, name: &str) -> Option<&[String]> {
        self.selections.get(name).map(Vec::as_slice)
    }

    /// Parse an uploaded file (format inferred from `name`) and store it.
    ///
    /// Re-uploading a name replaces its table and discards derived state.
    pub fn load(&mut self, name: &str, bytes: &[u8]) -> SweepResult<&Table> {
        let result = load_named(name, bytes, &self.options.load);
        self.options.observe(name, Stage::Load, &result, table_stats);
        self.store_loaded(name, result?);
        self.current(name)
    }

    /// Parse several uploads in parallel. Successful ones are stored; failures are returned
    /// per file.
    pub fn load_all(&mut self, files: &[(String, Vec<u8>)]) -> BTreeMap<String, SweepResult<()>> {
        let options = &self.options;
        let parsed: Vec<(String, SweepResult<Table>)> = files
            .par_iter()
            .map(|(name, bytes)| {
                let result = load_named(name, bytes, &options.load);
                options.observe(name, Stage::Load, &result, table_stats);
                (name.clone(), result)
            })
            .collect();

        parsed
            .into_iter()
            .map(|(name, result)| {
                let status = result.map(|table| self.store_loaded(&name, table));
                (name, status)
            })
            .collect()
    }

    fn store_loaded(&mut self, name: &str, table: Table) {
        self.loaded.insert(name, table);
        self.cleaned.remove(name);
        self.summaries.remove(name);
        self.selections.remove(name);
    }

    /// Clean the loaded table for `name`, replacing any earlier cleaned version.
    ///
    /// Cleaning always starts from the table as loaded, so changing the spec and cleaning again
    /// does not compound earlier passes. Any stored column selection is dropped.
    pub fn clean(&mut self, name: &str, spec: &CleaningSpec) -> SweepResult<&ChangeSummary> {
        let source = self.loaded.get(name).ok_or_else(|| SweepError::UnknownSource {
            name: name.to_string(),
        })?;
        let (table, summary) = clean(source, spec);
        self.options.observe(name, Stage::Clean, &Ok(&table), |t| table_stats(t));
        self.store_cleaned(name, table, summary);
        self.summary(name).ok_or_else(|| SweepError::UnknownSource {
            name: name.to_string(),
        })
    }

    /// Clean every loaded table in parallel. Sources missing from `specs` use
    /// [`CleaningSpec::default`].
    pub fn clean_all(&mut self, specs: &BTreeMap<String, CleaningSpec>) -> BTreeMap<String, ChangeSummary> {
        let options = &self.options;
        let names: Vec<&str> = self.loaded.names().collect();
        let results: Vec<(String, Table, ChangeSummary)> = names
            .par_iter()
            .filter_map(|name| {
                let table = self.loaded.get(name)?;
                let spec = specs.get(*name).copied().unwrap_or_default();
                let (cleaned, summary) = clean(table, &spec);
                options.observe(name, Stage::Clean, &Ok(&cleaned), |t| table_stats(t));
                Some((name.to_string(), cleaned, summary))
            })
            .collect();

        let mut out = BTreeMap::new();
        for (name, table, summary) in results {
            out.insert(name.clone(), summary.clone());
            self.store_cleaned(&name, table, summary);
        }
        out
    }

    fn store_cleaned(&mut self, name: &str, table: Table, summary: ChangeSummary) {
        self.cleaned.insert(name, table);
        self.summaries.insert(name.to_string(), summary);
        self.selections.remove(name);
    }

    /// Validate and store a column selection for `name`; an empty request selects every
    /// column. Returns the stored selection.
    pub fn select<S: AsRef<str>>(&mut self, name: &str, columns: &[S]) -> SweepResult<&[String]> {
        let result = self.current(name).and_then(|t| resolve_columns(t, columns));
        self.options.observe(name, Stage::Project, &result, |cols| StageStats {
            rows: self.current(name).map(Table::row_count).unwrap_or(0),
            columns: cols.len(),
        });
        self.selections.insert(name.to_string(), result?);
        self.selection(name).ok_or_else(|| SweepError::UnknownSource {
            name: name.to_string(),
        })
    }

    /// The latest table for `name` restricted to its stored selection (all columns if none).
    pub fn projected(&self, name: &str) -> SweepResult<Table> {
        let table = self.current(name)?;
        let columns = self.selection(name).unwrap_or(&[]);
        project(table, columns)
    }

    /// Export the projected table for `name`.
    pub fn export(&self, name: &str, format: ExportFormat) -> SweepResult<ExportArtifact> {
        let mut stats = StageStats { rows: 0, columns: 0 };
        let result = self.projected(name).and_then(|t| {
            stats = table_stats(&t);
            export_artifact(name, &t, format)
        });
        self.options.observe(name, Stage::Export, &result, |_| stats);
        result
    }

    /// Export every source in parallel. Sources missing from `formats` use `default_format`.
    pub fn export_all(
        &self,
        formats: &BTreeMap<String, ExportFormat>,
        default_format: ExportFormat,
    ) -> BTreeMap<String, SweepResult<ExportArtifact>> {
        let names: Vec<&str> = self.loaded.names().collect();
        names
            .par_iter()
            .map(|name| {
                let format = formats.get(*name).copied().unwrap_or(default_format);
                (name.to_string(), self.export(name, format))
            })
            .collect()
    }
}
