//! Aggregation pipelines executed by the MongoDB adapter.
//!
//! Builders are pure so the stage layout can be asserted without a server.
//! Date bounds arrive already formatted as `YYYY-MM-DD` strings.

use mongodb::bson::{doc, Bson, Document};

use super::domain::{ActionType, PublicationFilter, MONTH_ABBREVIATIONS};

fn tracked_types() -> Vec<Bson> {
    ActionType::ordered()
        .into_iter()
        .map(|action| Bson::String(action.label().to_string()))
        .collect()
}

fn count_when(field: &str, action: ActionType, amount: Bson) -> Document {
    doc! {
        "$sum": {
            "$cond": [{ "$eq": [field, action.label()] }, amount, 0]
        }
    }
}

pub fn search_filter(filter: &PublicationFilter) -> Document {
    let mut query = Document::new();
    if let Some(name) = &filter.name {
        query.insert("name", name.as_str());
    }
    if let Some(institute) = &filter.institute {
        query.insert("institute", institute.as_str());
    }
    if let Some(action_type) = &filter.action_type {
        query.insert("type", action_type.as_str());
    }
    if let Some(year) = filter.year {
        // Older imports stored the year as text.
        query.insert(
            "year",
            doc! { "$in": [Bson::Int32(year), Bson::String(year.to_string())] },
        );
    }
    query
}

pub fn type_totals(from: &str, to: &str) -> Vec<Document> {
    vec![
        doc! {
            "$match": {
                "type": { "$in": tracked_types() },
                "date": { "$gte": from, "$lte": to },
            }
        },
        doc! {
            "$group": {
                "_id": Bson::Null,
                "nomeacoes": count_when("$type", ActionType::Nomeacao, Bson::Int32(1)),
                "exoneracoes": count_when("$type", ActionType::Exoneracao, Bson::Int32(1)),
            }
        },
        doc! {
            "$project": { "_id": 0, "nomeacoes": 1, "exoneracoes": 1 }
        },
    ]
}

pub fn daily_counts(since: &str) -> Vec<Document> {
    let count = Bson::String("$count".to_string());
    vec![
        doc! {
            "$match": {
                "type": { "$in": tracked_types() },
                "date": { "$gte": since },
            }
        },
        doc! {
            "$group": {
                "_id": { "date": "$date", "type": "$type" },
                "count": { "$sum": 1 },
            }
        },
        doc! {
            "$group": {
                "_id": "$_id.date",
                "nomeacoes": count_when("$_id.type", ActionType::Nomeacao, count.clone()),
                "exoneracoes": count_when("$_id.type", ActionType::Exoneracao, count),
            }
        },
        doc! { "$sort": { "_id": 1 } },
        doc! {
            "$project": {
                "_id": 0,
                "date": "$_id",
                "nomeacoes": 1,
                "exoneracoes": 1,
            }
        },
    ]
}

pub fn responsible_ranking(since: &str, limit: i64) -> Vec<Document> {
    vec![
        doc! {
            "$match": {
                "type": { "$in": tracked_types() },
                "date": { "$gte": since },
            }
        },
        doc! {
            "$group": {
                "_id": { "$ifNull": ["$responsible", ""] },
                "institute": { "$first": { "$ifNull": ["$institute", ""] } },
                "nomeacoes": count_when("$type", ActionType::Nomeacao, Bson::Int32(1)),
                "exoneracoes": count_when("$type", ActionType::Exoneracao, Bson::Int32(1)),
                "total_acts": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "total_acts": -1, "_id": 1 } },
        doc! { "$limit": limit },
        doc! {
            "$project": {
                "_id": 0,
                "responsible": "$_id",
                "institute": 1,
                "responsible_institute": { "$concat": ["$_id", " - ", "$institute"] },
                "total_acts": 1,
                "nomeacoes": 1,
                "exoneracoes": 1,
            }
        },
    ]
}

fn month_rank_expression() -> Document {
    let branches: Vec<Bson> = MONTH_ABBREVIATIONS
        .iter()
        .zip(1..)
        .map(|(month, rank): (&&str, i32)| {
            Bson::Document(doc! {
                "case": { "$eq": ["$_id.month", *month] },
                "then": rank,
            })
        })
        .collect();

    doc! { "$switch": { "branches": branches, "default": 0 } }
}

/// Year as an integer whether it was stored as a number or as text;
/// unparsable or absent years become null.
fn normalized_year() -> Document {
    doc! {
        "$convert": {
            "input": "$year",
            "to": "int",
            "onError": Bson::Null,
            "onNull": Bson::Null,
        }
    }
}

/// Blank or absent months collapse into null.
fn normalized_month() -> Document {
    doc! {
        "$cond": [
            { "$eq": [{ "$ifNull": ["$month", ""] }, ""] },
            Bson::Null,
            "$month",
        ]
    }
}

pub fn institute_months(institutes: &[String]) -> Vec<Document> {
    vec![
        doc! { "$match": { "institute": { "$in": institutes.to_vec() } } },
        doc! {
            "$addFields": {
                "year": normalized_year(),
                "month": normalized_month(),
            }
        },
        doc! {
            "$group": {
                "_id": { "institute": "$institute", "year": "$year", "month": "$month" },
                "nomeacoes": count_when("$type", ActionType::Nomeacao, Bson::Int32(1)),
                "exoneracoes": count_when("$type", ActionType::Exoneracao, Bson::Int32(1)),
            }
        },
        doc! { "$addFields": { "month_rank": month_rank_expression() } },
        doc! {
            "$sort": {
                "_id.institute": 1,
                "_id.year": 1,
                "month_rank": 1,
                "_id.month": 1,
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "institute": "$_id.institute",
                "year": "$_id.year",
                "month": "$_id.month",
                "nomeacoes": 1,
                "exoneracoes": 1,
            }
        },
    ]
}

/// Newest date first; equal dates keep insertion order through `_id`.
pub fn latest_sort() -> Document {
    doc! { "date": -1, "_id": 1 }
}
