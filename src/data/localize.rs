//! Locale label tables and dataset localization.
//!
//! A table holds three kinds of strings for one locale:
//! - column headers for the four fields
//! - labels for the known category/mode wire values
//! - the dashboard's fixed UI text
//!
//! Wire values with no entry are left as-is.

use std::collections::BTreeSet;

use log::warn;

use crate::domain::{ColumnLabels, Dataset, Locale, Record};

/// Column headers for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLabels {
    pub year: &'static str,
    pub category: &'static str,
    pub mode: &'static str,
    pub count: &'static str,
}

/// Fixed dashboard strings for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiText {
    pub title: &'static str,
    pub source_name: &'static str,
    pub source_note: &'static str,
    pub year_prompt: &'static str,
    pub mode_prompt: &'static str,
    pub category_prompt: &'static str,
    pub chart_heading: &'static str,
    /// Contains a `{year}` placeholder.
    pub metrics_heading: &'static str,
    /// Appended to the category label on each metric card.
    pub count_suffix: &'static str,
    pub no_modes: &'static str,
    pub no_categories: &'static str,
    pub empty_chart: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTable {
    pub locale: Locale,
    pub fields: FieldLabels,
    values: &'static [(&'static str, &'static str)],
    pub text: UiText,
}

pub const SOURCE_URL: &str = "https://www.city.kitakyushu.lg.jp/shisei/menu05_0127.html";

static EN: LabelTable = LabelTable {
    locale: Locale::En,
    fields: FieldLabels {
        year: "Year",
        category: "Incident type",
        mode: "Activity",
        count: "Count",
    },
    values: &[
        ("General_injury", "General injury"),
        ("Other", "Other"),
        ("Perpetrator", "Assault"),
        ("Self-inflicted_damage", "Self-inflicted harm"),
        ("Sudden_illness", "Sudden illness"),
        ("Traffic_accident", "Traffic accident"),
        ("Work-related_accidents", "Work-related accident"),
        ("Dispatch", "Dispatch"),
        ("Transport", "Transport"),
    ],
    text: UiText {
        title: "Kitakyushu emergency activity",
        source_name: "Kitakyushu long-term time series statistics",
        source_note: "Emergency activity data is freely available from the city's statistics site.",
        year_prompt: "Which years do you want to see?",
        mode_prompt: "Which activity do you want to check?",
        category_prompt: "Which incident types do you want to check?",
        chart_heading: "Emergency activity over time",
        metrics_heading: "Emergency activity in {year}",
        count_suffix: " count",
        no_modes: "No dispatch/transport values in the dataset.",
        no_categories: "No incident types in the dataset.",
        empty_chart: "Nothing to plot for the current selection.",
    },
};

static JA: LabelTable = LabelTable {
    locale: Locale::Ja,
    fields: FieldLabels {
        year: "年",
        category: "類型",
        mode: "出動・搬送",
        count: "件数",
    },
    values: &[
        ("General_injury", "一般負傷"),
        ("Other", "その他"),
        ("Perpetrator", "加害"),
        ("Self-inflicted_damage", "自損行為"),
        ("Sudden_illness", "急病"),
        ("Traffic_accident", "交通事故"),
        ("Work-related_accidents", "労働災害"),
        ("Dispatch", "出動"),
        ("Transport", "搬送"),
    ],
    text: UiText {
        title: "北九州市の救急活動状況",
        source_name: "北九州市長期時系列統計",
        source_note: "のウェブサイトから救急活動状況データを無料で閲覧できます。",
        year_prompt: "何年の状況を見たいですか？",
        mode_prompt: "どの状況を確認したいですか？",
        category_prompt: "どの類型を確認したいですか？",
        chart_heading: "経年の救急活動状況",
        metrics_heading: "{year}年の救急活動",
        count_suffix: " 件数",
        no_modes: "どの状況を確認したいですか？",
        no_categories: "どの類型を確認したいですか？",
        empty_chart: "選択された条件に該当するデータがありません。",
    },
};

pub fn label_table(locale: Locale) -> &'static LabelTable {
    match locale {
        Locale::En => &EN,
        Locale::Ja => &JA,
    }
}

impl LabelTable {
    /// Localized label for a wire value, if the table knows it.
    pub fn lookup(&self, raw: &str) -> Option<&'static str> {
        self.values.iter().find(|(wire, _)| *wire == raw).map(|(_, label)| *label)
    }

    /// Localized label, or the wire value itself.
    pub fn label<'a>(&self, raw: &'a str) -> &'a str {
        self.lookup(raw).unwrap_or(raw)
    }

    pub fn columns(&self) -> ColumnLabels {
        ColumnLabels {
            year: self.fields.year.to_string(),
            category: self.fields.category.to_string(),
            mode: self.fields.mode.to_string(),
            count: self.fields.count.to_string(),
        }
    }

    pub fn metrics_heading(&self, year: i32) -> String {
        self.text.metrics_heading.replace("{year}", &year.to_string())
    }

    /// Label shown on a metric card, e.g. "Traffic accident count".
    pub fn metric_label(&self, category: &str) -> String {
        format!("{}{}", self.label(category), self.text.count_suffix)
    }
}

/// Rename the columns and relabel category/mode values for `locale`.
///
/// Unknown values are kept unchanged. This runs on every view rebuild, so it
/// does not log; see `warn_unlabeled`.
pub fn localize(dataset: &Dataset, locale: Locale) -> Dataset {
    let table = label_table(locale);

    let records = dataset
        .records
        .iter()
        .map(|r| Record {
            year: r.year,
            category: table.label(&r.category).to_string(),
            mode: table.label(&r.mode).to_string(),
            count: r.count,
        })
        .collect();

    Dataset {
        records,
        columns: table.columns(),
    }
}

/// Distinct category/mode values with no label for `locale`, sorted.
pub fn unlabeled(dataset: &Dataset, locale: Locale) -> Vec<String> {
    let table = label_table(locale);
    let unknown: BTreeSet<&str> = dataset
        .records
        .iter()
        .flat_map(|r| [r.category.as_str(), r.mode.as_str()])
        .filter(|raw| table.lookup(raw).is_none())
        .collect();
    unknown.into_iter().map(str::to_string).collect()
}

/// Log one warning per unlabeled value. Call once per loaded snapshot.
pub fn warn_unlabeled(dataset: &Dataset, locale: Locale) -> usize {
    let unknown = unlabeled(dataset, locale);
    for raw in &unknown {
        warn!("no {} label for value '{raw}', showing it unlocalized", locale.code());
    }
    unknown.len()
}
