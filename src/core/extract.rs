use crate::domain::model::RankingRecord;
use crate::utils::error::{Result, ToolkitError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub const RATING_COUNT: FieldSelector = FieldSelector::new("span", "ranking-item__rating--count");
pub const RATING_VALUE: FieldSelector = FieldSelector::new("span", "ranking-item__rating--value");
pub const PRICE: FieldSelector = FieldSelector::new("div", "ranking-item__price");
pub const DESCRIPTION: FieldSelector = FieldSelector::new("div", "ranking-item__desc");
pub const ITEM: FieldSelector = FieldSelector::new("*", "ranking-item");

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid decimal regex"));
static GROUPED_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*").expect("valid integer regex"));
static FILLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfilled\b").expect("valid marker regex"));

/// 以標籤名稱加 class 定位元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelector {
    pub tag: &'static str,
    pub class: &'static str,
}

impl FieldSelector {
    pub const fn new(tag: &'static str, class: &'static str) -> Self {
        Self { tag, class }
    }

    pub fn css(&self) -> String {
        format!("{}.{}", self.tag, self.class)
    }

    pub fn compile(&self) -> Result<Selector> {
        let css = self.css();
        Selector::parse(&css).map_err(|e| ToolkitError::ParseError {
            message: format!("invalid selector '{}': {}", css, e),
        })
    }
}

/// 單一頁面解析一次後取出的五組欄位
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFields {
    pub rankings: Vec<u32>,
    pub ratings: Vec<Option<f64>>,
    pub reviews: Vec<Option<u64>>,
    pub costs: Vec<u8>,
    pub summaries: Vec<String>,
}

pub struct RankingPage {
    document: Html,
    limit: usize,
}

impl RankingPage {
    pub fn parse(html: &str, limit: usize) -> Self {
        Self {
            document: Html::parse_document(html),
            limit,
        }
    }

    fn select(&self, field: FieldSelector) -> Result<Vec<ElementRef<'_>>> {
        let selector = field.compile()?;
        Ok(self.document.select(&selector).take(self.limit).collect())
    }

    pub fn rankings(&self) -> Result<Vec<u32>> {
        let count = self.select(RATING_COUNT)?.len();
        Ok((1..=count as u32).collect())
    }

    pub fn ratings(&self) -> Result<Vec<Option<f64>>> {
        Ok(self
            .select(RATING_VALUE)?
            .into_iter()
            .map(|el| parse_rating(&element_text(&el)))
            .collect())
    }

    pub fn reviews(&self) -> Result<Vec<Option<u64>>> {
        Ok(self
            .select(RATING_COUNT)?
            .into_iter()
            .map(|el| parse_review_count(&element_text(&el)))
            .collect())
    }

    pub fn costs(&self) -> Result<Vec<u8>> {
        Ok(self
            .select(PRICE)?
            .into_iter()
            .map(|el| count_cost_markers(&el.html()))
            .collect())
    }

    pub fn summaries(&self) -> Result<Vec<String>> {
        Ok(self
            .select(DESCRIPTION)?
            .into_iter()
            .map(|el| clean_summary(&element_text(&el)))
            .collect())
    }

    /// 先找出每個項目容器，再在容器內取欄位；沒有容器時才依頁內位置組合
    pub fn records(&self, topic: &str) -> Result<Vec<RankingRecord>> {
        let items = self.select(ITEM)?;
        if items.is_empty() {
            tracing::debug!("No item containers for '{}', pairing fields by position", topic);
            return Ok(zip_page(topic, self.fields()?));
        }

        let selectors = ItemSelectors::compile()?;
        let records: Vec<RankingRecord> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| selectors.record(topic, i as u32 + 1, item))
            .collect();

        let incomplete = records
            .iter()
            .filter(|r| r.rating.is_none() || r.reviews.is_none() || r.cost.is_none())
            .count();
        if incomplete > 0 {
            tracing::warn!(
                "⚠️ {} of {} items on '{}' are missing fields",
                incomplete,
                records.len(),
                topic
            );
        }
        if records.len() < items.len() {
            tracing::warn!(
                "⚠️ Skipped {} items without a description on '{}'",
                items.len() - records.len(),
                topic
            );
        }
        Ok(records)
    }

    pub fn fields(&self) -> Result<PageFields> {
        Ok(PageFields {
            rankings: self.rankings()?,
            ratings: self.ratings()?,
            reviews: self.reviews()?,
            costs: self.costs()?,
            summaries: self.summaries()?,
        })
    }
}

struct ItemSelectors {
    count: Selector,
    value: Selector,
    price: Selector,
    desc: Selector,
}

impl ItemSelectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            count: RATING_COUNT.compile()?,
            value: RATING_VALUE.compile()?,
            price: PRICE.compile()?,
            desc: DESCRIPTION.compile()?,
        })
    }

    /// 沒有摘要的容器不算一筆
    fn record(&self, topic: &str, ranking: u32, item: &ElementRef<'_>) -> Option<RankingRecord> {
        let first = |selector: &Selector| item.select(selector).next();
        let summary = clean_summary(&element_text(&first(&self.desc)?));

        Some(RankingRecord {
            topic: topic.to_string(),
            ranking,
            rating: first(&self.value).and_then(|el| parse_rating(&element_text(&el))),
            reviews: first(&self.count).and_then(|el| parse_review_count(&element_text(&el))),
            cost: first(&self.price).map(|el| count_cost_markers(&el.html())),
            summary,
        })
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

pub fn parse_rating(text: &str) -> Option<f64> {
    DECIMAL.find(text)?.as_str().parse().ok()
}

pub fn parse_review_count(text: &str) -> Option<u64> {
    let digits: String = GROUPED_INT
        .find(text)?
        .as_str()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}

/// 價格以實心圖示數量表示（$ 到 $$$$）
pub fn count_cost_markers(fragment: &str) -> u8 {
    FILLED.find_iter(fragment).count().min(u8::MAX as usize) as u8
}

pub fn clean_summary(text: &str) -> String {
    text.replace(['\n', '\r'], "").trim().to_string()
}

/// 依頁內位置組合欄位；筆數以摘要數量為準，缺的欄位留空
pub fn zip_page(topic: &str, fields: PageFields) -> Vec<RankingRecord> {
    let n = fields.summaries.len();
    let lens = [
        fields.rankings.len(),
        fields.ratings.len(),
        fields.reviews.len(),
        fields.costs.len(),
    ];
    if lens.iter().any(|len| *len != n) {
        tracing::warn!(
            "⚠️ Field counts differ on '{}': summaries={}, rankings={}, ratings={}, reviews={}, costs={}",
            topic,
            n,
            lens[0],
            lens[1],
            lens[2],
            lens[3]
        );
    }

    fields
        .summaries
        .into_iter()
        .enumerate()
        .map(|(i, summary)| RankingRecord {
            topic: topic.to_string(),
            ranking: fields
                .rankings
                .get(i)
                .copied()
                .unwrap_or(i as u32 + 1),
            rating: fields.ratings.get(i).copied().flatten(),
            reviews: fields.reviews.get(i).copied().flatten(),
            cost: fields.costs.get(i).copied(),
            summary,
        })
        .collect()
}
