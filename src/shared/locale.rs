use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

/// Display languages carried by the station dataset.
/// `Ko` is the primary name, `En` the fallback for everything else.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
    Ja,
    Zh,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::Ko, Locale::En, Locale::Ja, Locale::Zh];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
            Locale::Ja => "ja",
            Locale::Zh => "zh",
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        match self {
            Locale::Ko => format!("{}년 {}월 {}일", date.year(), date.month(), date.day()),
            Locale::En => date.format("%B %-d, %Y").to_string(),
            Locale::Ja | Locale::Zh => {
                format!("{}年{}月{}日", date.year(), date.month(), date.day())
            }
        }
    }

    /// Localized name of an ISO 3166 alpha-2 country code. Unknown codes are
    /// returned upper-cased as-is.
    pub fn country_name(&self, code: &str) -> String {
        let code = code.trim().to_ascii_uppercase();
        COUNTRIES
            .iter()
            .find(|(known, ..)| *known == code)
            .map(|(_, ko, en, ja, zh)| match self {
                Locale::Ko => *ko,
                Locale::En => *en,
                Locale::Ja => *ja,
                Locale::Zh => *zh,
            })
            .map(str::to_string)
            .unwrap_or(code)
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" => Ok(Locale::Ko),
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            "zh" => Ok(Locale::Zh),
            _ => Err(UnsupportedLocale(s.to_string())),
        }
    }
}

/// Regional indicator flag for a two letter country code, `None` for anything
/// that is not two ASCII letters.
pub fn flag_emoji(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

// (code, ko, en, ja, zh)
const COUNTRIES: &[(&str, &str, &str, &str, &str)] = &[
    ("KR", "대한민국", "South Korea", "韓国", "韩国"),
    ("JP", "일본", "Japan", "日本", "日本"),
    ("CN", "중국", "China", "中国", "中国"),
    ("TW", "대만", "Taiwan", "台湾", "台湾"),
    ("HK", "홍콩", "Hong Kong", "香港", "香港"),
    ("US", "미국", "United States", "アメリカ", "美国"),
    ("CA", "캐나다", "Canada", "カナダ", "加拿大"),
    ("GB", "영국", "United Kingdom", "イギリス", "英国"),
    ("FR", "프랑스", "France", "フランス", "法国"),
    ("DE", "독일", "Germany", "ドイツ", "德国"),
    ("ES", "스페인", "Spain", "スペイン", "西班牙"),
    ("IT", "이탈리아", "Italy", "イタリア", "意大利"),
    ("AU", "호주", "Australia", "オーストラリア", "澳大利亚"),
    ("SG", "싱가포르", "Singapore", "シンガポール", "新加坡"),
    ("TH", "태국", "Thailand", "タイ", "泰国"),
    ("VN", "베트남", "Vietnam", "ベトナム", "越南"),
    ("PH", "필리핀", "Philippines", "フィリピン", "菲律宾"),
    ("ID", "인도네시아", "Indonesia", "インドネシア", "印度尼西亚"),
    ("MY", "말레이시아", "Malaysia", "マレーシア", "马来西亚"),
    ("IN", "인도", "India", "インド", "印度"),
];
