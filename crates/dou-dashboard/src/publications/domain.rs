use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Storage format of the `date` field. Lexicographic order equals calendar order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Institute codes covered by the monthly overview.
pub const KNOWN_INSTITUTES: [&str; 38] = [
    "IFAC",
    "IFAL",
    "IFAM",
    "IFAP",
    "IFBA",
    "IFBAIANO",
    "IFB",
    "IFCE",
    "IFES",
    "IFG",
    "IFGOIANO",
    "IFMA",
    "IFMG",
    "IFNMG",
    "IFSULDEMINAS",
    "IFSUDESTEMG",
    "IFTM",
    "IFMS",
    "IFMT",
    "IFPA",
    "IFPB",
    "IFPE",
    "IFSERTAOPE",
    "IFPI",
    "IFPR",
    "IFRJ",
    "IFF",
    "IFRN",
    "IFRS",
    "IFFAR",
    "IFSUL",
    "IFRO",
    "IFRR",
    "IFSC",
    "IFC",
    "IFSP",
    "IFS",
    "IFTO",
];

/// Month abbreviations as published, in calendar order.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Calendar position of a month abbreviation; 0 for anything unrecognized.
pub fn month_rank(month: &str) -> u8 {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|candidate| *candidate == month)
        .map(|index| index as u8 + 1)
        .unwrap_or(0)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Personnel action kinds tallied by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "Nomeação")]
    Nomeacao,
    #[serde(rename = "Exoneração")]
    Exoneracao,
}

impl ActionType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Nomeacao, Self::Exoneracao]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nomeacao => "Nomeação",
            Self::Exoneracao => "Exoneração",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|action| action.label() == label)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A gazette publication as stored by the ingestion process.
///
/// The collection is not schema-enforced, so every field tolerates absence or
/// an explicit null, and `type` keeps whatever label was stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationRecord {
    #[serde(deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub institute: String,
    #[serde(rename = "type", deserialize_with = "deserialize_text")]
    pub action_type: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub date: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub responsible: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(deserialize_with = "deserialize_optional_text")]
    pub month: Option<String>,
}

impl PublicationRecord {
    pub fn action(&self) -> Option<ActionType> {
        ActionType::from_label(&self.action_type)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<YearRepr>::deserialize(deserializer)?;
    let year = match raw {
        None => None,
        Some(YearRepr::Int(value)) => Some(value),
        Some(YearRepr::Float(value)) if value.fract() == 0.0 => Some(value as i64),
        Some(YearRepr::Float(value)) => {
            return Err(serde::de::Error::custom(format!(
                "year must be a whole number, got {value}"
            )))
        }
        Some(YearRepr::Text(text)) if text.trim().is_empty() => None,
        Some(YearRepr::Text(text)) => Some(text.trim().parse::<i64>().map_err(|err| {
            serde::de::Error::custom(format!("failed to parse '{text}' as a year ({err})"))
        })?),
    };

    year.map(|value| i32::try_from(value).map_err(serde::de::Error::custom))
        .transpose()
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

/// Optional equality filters accepted by the search endpoint.
///
/// Blank query values (`?name=&year=`) count as omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PublicationFilter {
    #[serde(deserialize_with = "deserialize_optional_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_text")]
    pub institute: Option<String>,
    #[serde(rename = "type", deserialize_with = "deserialize_optional_text")]
    pub action_type: Option<String>,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
}

impl PublicationFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.institute.is_none()
            && self.action_type.is_none()
            && self.year.is_none()
    }

    pub fn matches(&self, record: &PublicationRecord) -> bool {
        fn field_matches(expected: &Option<String>, actual: &str) -> bool {
            expected.as_deref().map_or(true, |value| value == actual)
        }

        field_matches(&self.name, &record.name)
            && field_matches(&self.institute, &record.institute)
            && field_matches(&self.action_type, &record.action_type)
            && self.year.map_or(true, |year| record.year == Some(year))
    }
}

/// Inclusive calendar window, compared on the stored string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, stored: &str) -> bool {
        let from = format_date(self.from);
        let to = format_date(self.to);
        stored >= from.as_str() && stored <= to.as_str()
    }
}

/// Counts for one calendar day. Serialized verbatim by the series endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: String,
    pub nomeacoes: u64,
    pub exoneracoes: u64,
}

impl DayBucket {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date: format_date(date),
            nomeacoes: 0,
            exoneracoes: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub nomeacoes: u64,
    pub exoneracoes: u64,
}

impl TypeTotals {
    pub fn record(&mut self, action: ActionType) {
        match action {
            ActionType::Nomeacao => self.nomeacoes += 1,
            ActionType::Exoneracao => self.exoneracoes += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.nomeacoes + self.exoneracoes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsibleRanking {
    pub responsible: String,
    pub institute: String,
    pub responsible_institute: String,
    pub total_acts: u64,
    pub nomeacoes: u64,
    pub exoneracoes: u64,
}

impl ResponsibleRanking {
    pub fn new(responsible: String, institute: String, totals: TypeTotals) -> Self {
        let responsible_institute = format!("{responsible} - {institute}");
        Self {
            responsible,
            institute,
            responsible_institute,
            total_acts: totals.total(),
            nomeacoes: totals.nomeacoes,
            exoneracoes: totals.exoneracoes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstituteMonthRow {
    pub institute: String,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub month: Option<String>,
    pub nomeacoes: u64,
    pub exoneracoes: u64,
}

impl InstituteMonthRow {
    pub fn month_rank(&self) -> u8 {
        self.month.as_deref().map(month_rank).unwrap_or(0)
    }
}
