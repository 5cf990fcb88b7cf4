use super::builder::{MatchField, MatchQuery, QueryTree};
use crate::config::QueryConfig;
use crate::index::schema::ShardSchema;
use tantivy::query::{
    AllQuery, BooleanQuery, BoostQuery, EmptyQuery, FuzzyTermQuery, Occur, Query, TermQuery,
};
use tantivy::schema::IndexRecordOption;
use tantivy::Term;

/// Edit distance used when typo tolerance is enabled for a field.
const FUZZY_DISTANCE: u8 = 2;

fn term_for(schema: &ShardSchema, field: &MatchField, text: &str) -> Term {
    match field {
        MatchField::Composite => Term::from_field_text(schema.all_field(), text),
        MatchField::Named(name) => {
            let mut term = Term::from_field_json_path(schema.text_field_for(name), name, true);
            term.append_type_and_str(text);
            term
        }
    }
}

fn should(mut clauses: Vec<Box<dyn Query>>) -> Box<dyn Query> {
    if clauses.len() == 1 {
        if let Some(only) = clauses.pop() {
            return only;
        }
    }
    Box::new(BooleanQuery::new(
        clauses.into_iter().map(|q| (Occur::Should, q)).collect(),
    ))
}

fn compile_match(schema: &ShardSchema, m: &MatchQuery) -> Box<dyn Query> {
    let terms = m.analyzer.terms(&m.text);
    if terms.is_empty() {
        return Box::new(EmptyQuery);
    }

    let clauses: Vec<Box<dyn Query>> = terms
        .iter()
        .map(|text| {
            let term = term_for(schema, &m.field, text);
            let exact: Box<dyn Query> =
                Box::new(TermQuery::new(term.clone(), IndexRecordOption::WithFreqs));
            if m.fuzziness >= QueryConfig::FUZZY {
                // exact clause keeps BM25 ranking; fuzzy matches score a constant
                let fuzzy: Box<dyn Query> =
                    Box::new(FuzzyTermQuery::new(term, FUZZY_DISTANCE, true));
                should(vec![exact, fuzzy])
            } else {
                exact
            }
        })
        .collect();

    let query = should(clauses);
    match m.boost {
        Some(boost) => Box::new(BoostQuery::new(query, boost)),
        None => query,
    }
}

/// Compile a query tree against one shard's schema.
pub fn compile(tree: &QueryTree, schema: &ShardSchema) -> Box<dyn Query> {
    match tree {
        QueryTree::MatchAll => Box::new(AllQuery),
        QueryTree::Match(m) => compile_match(schema, m),
        QueryTree::Should(clauses) => {
            should(clauses.iter().map(|m| compile_match(schema, m)).collect())
        }
    }
}
