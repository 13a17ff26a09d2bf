//! Tantivy full-text index over the building directory.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{document::Value, Field, Schema, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};

use crate::directory::Building;
use crate::error::{ResolveError, Result};

const SEARCH_LIMIT: usize = 50;

/// Full-text search index over buildings, persisted in a cache entry dir.
pub struct BuildingIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    id_field: Field,
    name_field: Field,
    description_field: Field,
    floors_field: Field,
}

impl BuildingIndex {
    /// Create a fresh index in `dir` (which must be empty).
    pub fn create(dir: &Path) -> Result<Self> {
        let mut schema_builder = Schema::builder();
        schema_builder.add_text_field("building_id", STRING | STORED);
        schema_builder.add_text_field("name", TEXT | STORED);
        schema_builder.add_text_field("description", TEXT);
        schema_builder.add_text_field("floors", TEXT);
        let schema = schema_builder.build();

        let index = Index::create_in_dir(dir, schema)
            .map_err(|e| ResolveError::Index(e.to_string()))?;
        Self::from_index(index)
    }

    /// Open an index previously created in `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        let index =
            Index::open_in_dir(dir).map_err(|e| ResolveError::Index(e.to_string()))?;
        Self::from_index(index)
    }

    fn from_index(index: Index) -> Result<Self> {
        let schema = index.schema();
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| ResolveError::Index(e.to_string()))
        };
        let id_field = field("building_id")?;
        let name_field = field("name")?;
        let description_field = field("description")?;
        let floors_field = field("floors")?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e: tantivy::TantivyError| ResolveError::Index(e.to_string()))?;

        let writer = index
            .writer(50_000_000)
            .map_err(|e| ResolveError::Index(e.to_string()))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            id_field,
            name_field,
            description_field,
            floors_field,
        })
    }

    /// Index one batch of buildings and commit it.
    pub fn bulk_index(&self, batch: &[Building]) -> Result<()> {
        let mut writer = self.writer.write();
        for building in batch {
            let term = tantivy::Term::from_field_text(self.id_field, &building.id);
            writer.delete_term(term);
            writer
                .add_document(doc!(
                    self.id_field => building.id.clone(),
                    self.name_field => building.name.clone(),
                    self.description_field => building.description.clone(),
                    self.floors_field => building.floor_names.join(" "),
                ))
                .map_err(|e| ResolveError::Index(e.to_string()))?;
        }
        writer
            .commit()
            .map_err(|e| ResolveError::Index(e.to_string()))?;
        self.reader
            .reload()
            .map_err(|e| ResolveError::Index(e.to_string()))?;
        Ok(())
    }

    /// Ranked `(building_id, score)` hits for a free-text query.
    pub fn search(&self, query_text: &str) -> Result<Vec<(String, f32)>> {
        let searcher = self.reader.searcher();
        let query_parser = QueryParser::for_index(
            &self.index,
            vec![self.name_field, self.description_field, self.floors_field],
        );
        let query = query_parser
            .parse_query_lenient(query_text)
            .0;

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(SEARCH_LIMIT))
            .map_err(|e| ResolveError::Query(e.to_string()))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| ResolveError::Query(e.to_string()))?;
            let id = doc
                .get_first(self.id_field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            hits.push((id, score));
        }
        Ok(hits)
    }
}
