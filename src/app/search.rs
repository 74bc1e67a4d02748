use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::notes::Note;

use super::graph::GraphModel;

pub(in crate::app) struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<usize>>,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn best_score<'a>(
    matcher: &SkimMatcherV2,
    fields: impl IntoIterator<Item = &'a str>,
    query: &str,
) -> Option<i64> {
    fields
        .into_iter()
        .filter_map(|field| fuzzy_match_score(matcher, field, query))
        .max()
}

/// Indices of graph nodes whose title, id or tags match `query`. Reuses
/// `cache` while neither the query nor the mounted graph changed.
pub(in crate::app) fn matching_nodes(
    cache: &mut Option<SearchMatchCache>,
    graph: &GraphModel,
    graph_revision: u64,
    query: &str,
) -> Option<Arc<HashSet<usize>>> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(cached) = cache.as_ref()
        && cached.graph_revision == graph_revision
        && cached.query == query
    {
        return Some(Arc::clone(&cached.matches));
    }

    let matcher = SkimMatcherV2::default();
    let matches = graph
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let fields = [node.title.as_str(), node.id.as_str()]
                .into_iter()
                .chain(node.tags.iter().map(String::as_str));
            best_score(&matcher, fields, query).map(|_| index)
        })
        .collect::<HashSet<_>>();
    let matches = Arc::new(matches);

    *cache = Some(SearchMatchCache {
        query: query.to_owned(),
        graph_revision,
        matches: Arc::clone(&matches),
    });

    Some(matches)
}

/// Notes matching `query`, best match first; every note in canonical order
/// when the query is blank.
pub(in crate::app) fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let query = query.trim();
    if query.is_empty() {
        return notes.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = notes
        .iter()
        .filter_map(|note| {
            let title = note.title();
            let fields = [title.as_str(), note.content.as_str()]
                .into_iter()
                .chain(note.tags.iter().map(String::as_str));
            best_score(&matcher, fields, query).map(|score| (score, note))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, note)| note).collect()
}
