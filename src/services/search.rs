//! Full-text index over item fields, backed by tantivy.
//!
//! Indexed text goes through the `inventory` analyzer (simple tokenizer, long-token removal,
//! lowercasing, stop-word removal, English stemming). A second, unstemmed copy of every field
//! feeds the `spelling` dictionary that spelling suggestions are drawn from.

use crate::entities::item;
use crate::errors::ServiceError;
use std::collections::HashMap;
use std::path::Path;
use tantivy::{
    collector::TopDocs,
    directory::MmapDirectory,
    doc,
    query::QueryParser,
    schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, INDEXED, STORED},
    tokenizer::{
        Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
        TextAnalyzer,
    },
    DocSet, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term, TERMINATED,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

const ANALYZER: &str = "inventory";
const SPELLING_ANALYZER: &str = "inventory_spelling";
const WRITER_HEAP_BYTES: usize = 50_000_000;
const MAX_TOKEN_LEN: usize = 40;
const MAX_EDIT_DISTANCE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub item_id: i32,
    pub score: f32,
}

#[derive(Clone, Copy)]
struct ItemFields {
    id: Field,
    manufacturer: Field,
    model: Field,
    part_or_unit: Field,
    part_number: Field,
    description: Field,
    location: Field,
    spelling: Field,
}

impl ItemFields {
    fn searchable(&self) -> Vec<Field> {
        vec![
            self.manufacturer,
            self.model,
            self.part_or_unit,
            self.part_number,
            self.description,
            self.location,
        ]
    }
}

fn build_schema() -> (Schema, ItemFields) {
    let mut builder = Schema::builder();

    let analyzed = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(ANALYZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    let spelling = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(SPELLING_ANALYZER)
            .set_index_option(IndexRecordOption::Basic),
    );

    let fields = ItemFields {
        id: builder.add_i64_field("id", INDEXED | STORED),
        manufacturer: builder.add_text_field("manufacturer", analyzed.clone()),
        model: builder.add_text_field("model", analyzed.clone()),
        part_or_unit: builder.add_text_field("part_or_unit", analyzed.clone()),
        part_number: builder.add_text_field("part_number", analyzed.clone()),
        description: builder.add_text_field("description", analyzed.clone()),
        location: builder.add_text_field("location", analyzed),
        spelling: builder.add_text_field("spelling", spelling),
    };

    (builder.build(), fields)
}

fn analyzer(stop_words: &[String], stem: bool) -> TextAnalyzer {
    let base = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LEN))
        .filter(LowerCaser)
        .filter(StopWordFilter::remove(stop_words.to_vec()));
    if stem {
        base.filter(Stemmer::new(Language::English)).build()
    } else {
        base.build()
    }
}

/// Runs `text` through an analyzer and collects the surviving tokens.
fn tokens(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut out = Vec::new();
    while stream.advance() {
        out.push(stream.token().text.clone());
    }
    out
}

pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: ItemFields,
    spelling_analyzer: TextAnalyzer,
}

impl SearchIndex {
    /// Opens the index stored in `dir`, creating the directory and an empty index when absent.
    pub fn open(dir: &Path, stop_words: &[String]) -> Result<Self, ServiceError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            ServiceError::SearchError(format!("cannot create {}: {}", dir.display(), e))
        })?;
        let (schema, fields) = build_schema();
        let directory = MmapDirectory::open(dir)
            .map_err(|e| ServiceError::SearchError(e.to_string()))?;
        let index = Index::open_or_create(directory, schema)?;
        info!(path = %dir.display(), "search index opened");
        Self::from_index(index, fields, stop_words)
    }

    pub fn open_in_memory(stop_words: &[String]) -> Result<Self, ServiceError> {
        let (schema, fields) = build_schema();
        Self::from_index(Index::create_in_ram(schema), fields, stop_words)
    }

    fn from_index(
        index: Index,
        fields: ItemFields,
        stop_words: &[String],
    ) -> Result<Self, ServiceError> {
        index
            .tokenizers()
            .register(ANALYZER, analyzer(stop_words, true));
        index
            .tokenizers()
            .register(SPELLING_ANALYZER, analyzer(stop_words, false));

        let writer: IndexWriter = index.writer(WRITER_HEAP_BYTES)?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index,
            reader,
            writer: Mutex::new(writer),
            fields,
            spelling_analyzer: analyzer(stop_words, false),
        })
    }

    fn document(&self, item: &item::Model) -> TantivyDocument {
        let f = &self.fields;
        let part_or_unit = item.part_or_unit.to_string();
        let spelling = [
            item.manufacturer.as_str(),
            item.model.as_str(),
            part_or_unit.as_str(),
            item.part_number.as_str(),
            item.description.as_str(),
            item.location.as_str(),
        ]
        .join(" ");

        doc!(
            f.id => i64::from(item.id),
            f.manufacturer => item.manufacturer.as_str(),
            f.model => item.model.as_str(),
            f.part_or_unit => part_or_unit.as_str(),
            f.part_number => item.part_number.as_str(),
            f.description => item.description.as_str(),
            f.location => item.location.as_str(),
            f.spelling => spelling,
        )
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Inserts or replaces the document for `item`.
    pub async fn index_item(&self, item: &item::Model) -> Result<(), ServiceError> {
        self.index_items(std::slice::from_ref(item)).await
    }

    /// Upserts a batch under one commit.
    pub async fn index_items(&self, items: &[item::Model]) -> Result<(), ServiceError> {
        let mut writer = self.writer.lock().await;
        for item in items {
            writer.delete_term(Term::from_field_i64(self.fields.id, i64::from(item.id)));
            writer.add_document(self.document(item))?;
        }
        writer.commit()?;
        self.reader.reload()?;
        debug!(count = items.len(), "indexed items");
        Ok(())
    }

    pub async fn remove_item(&self, id: i32) -> Result<(), ServiceError> {
        let mut writer = self.writer.lock().await;
        writer.delete_term(Term::from_field_i64(self.fields.id, i64::from(id)));
        writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    /// Drops every document, then indexes `items` from scratch.
    pub async fn rebuild(&self, items: &[item::Model]) -> Result<(), ServiceError> {
        let mut writer = self.writer.lock().await;
        writer.delete_all_documents()?;
        for item in items {
            writer.add_document(self.document(item))?;
        }
        writer.commit()?;
        self.reader.reload()?;
        info!(count = items.len(), "search index rebuilt");
        Ok(())
    }

    /// Items matching every query term, best first. Blank or unmatched queries yield nothing.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ServiceError> {
        if query.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut parser = QueryParser::for_index(&self.index, self.fields.searchable());
        parser.set_conjunction_by_default();
        parser.set_field_boost(self.fields.manufacturer, 2.0);
        parser.set_field_boost(self.fields.model, 2.0);
        parser.set_field_boost(self.fields.part_number, 1.5);

        let (parsed, errors) = parser.parse_query_lenient(query);
        if !errors.is_empty() {
            debug!(query, ?errors, "query parsed leniently");
        }

        let searcher = self.reader.searcher();
        let top = searcher.search(&parsed, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top.len());
        for (score, address) in top {
            let stored: TantivyDocument = searcher.doc(address)?;
            if let Some(id) = stored
                .get_first(self.fields.id)
                .and_then(|v| v.as_i64())
                .and_then(|v| i32::try_from(v).ok())
            {
                hits.push(SearchHit { item_id: id, score });
            }
        }
        Ok(hits)
    }

    /// Term -> live document count over the unstemmed spelling field.
    ///
    /// Segment term dictionaries keep deleted documents until a merge, so postings are walked
    /// against the alive bitset and terms left with no live document are dropped.
    fn spelling_dictionary(&self) -> Result<HashMap<String, u32>, ServiceError> {
        let searcher = self.reader.searcher();
        let mut dictionary: HashMap<String, u32> = HashMap::new();
        for segment in searcher.segment_readers() {
            let alive = segment.alive_bitset();
            let inverted = segment
                .inverted_index(self.fields.spelling)
                .map_err(|e| ServiceError::SearchError(e.to_string()))?;
            let mut stream = inverted
                .terms()
                .stream()
                .map_err(|e| ServiceError::SearchError(e.to_string()))?;
            while stream.advance() {
                let Ok(term) = std::str::from_utf8(stream.key()) else {
                    continue;
                };
                let live = match alive {
                    None => stream.value().doc_freq,
                    Some(bitset) => {
                        let mut postings = inverted
                            .read_postings_from_terminfo(stream.value(), IndexRecordOption::Basic)
                            .map_err(|e| ServiceError::SearchError(e.to_string()))?;
                        let mut count = 0;
                        let mut doc = postings.doc();
                        while doc != TERMINATED {
                            if bitset.is_alive(doc) {
                                count += 1;
                            }
                            doc = postings.advance();
                        }
                        count
                    }
                };
                if live > 0 {
                    *dictionary.entry(term.to_string()).or_default() += live;
                }
            }
        }
        Ok(dictionary)
    }

    /// A corrected query when some token is unknown but close to an indexed one.
    pub fn suggest(&self, query: &str) -> Result<Option<String>, ServiceError> {
        let mut analyzer = self.spelling_analyzer.clone();
        let words = tokens(&mut analyzer, query);
        if words.is_empty() {
            return Ok(None);
        }

        let dictionary = self.spelling_dictionary()?;
        if dictionary.is_empty() {
            return Ok(None);
        }

        let mut changed = false;
        let corrected: Vec<String> = words
            .into_iter()
            .map(|word| {
                if dictionary.contains_key(&word) {
                    return word;
                }
                match closest_term(&word, &dictionary) {
                    Some(term) => {
                        changed = true;
                        term
                    }
                    None => word,
                }
            })
            .collect();

        Ok(changed.then(|| corrected.join(" ")))
    }
}

/// Nearest dictionary term within the edit budget; ties go to the more frequent term, then
/// the lexically smaller one so the answer is stable.
fn closest_term(word: &str, dictionary: &HashMap<String, u32>) -> Option<String> {
    dictionary
        .iter()
        .filter_map(|(term, freq)| {
            let distance = strsim::levenshtein(word, term);
            (distance <= MAX_EDIT_DISTANCE).then_some((distance, *freq, term))
        })
        .min_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.cmp(b.2))
        })
        .map(|(_, _, term)| term.clone())
}
