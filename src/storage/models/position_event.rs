use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 持倉事件類型
///
/// 交易、股利、分割等所有影響持倉的事件共用同一個模型，以 kind 區分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionEventKind {
    Transaction,
    Dividend,
    Interest,
    Fee,
    Tax,
    StockSplit,
    StockMerge,
    StockSpinoff,
    StockDividend,
    StockBonus,
    StockRights,
    StockBuyback,
    StockConversion,
    StockReclassification,
    StockReorganization,
    StockLiquidation,
    StockOther,
    StockEvent,
    Stock,
    Bond,
}

/// 事件類型所使用的欄位組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMeasure {
    /// quantity、price、type、commission、fees
    Trade,
    /// amount
    Amount,
    /// ratio
    Ratio,
}

impl PositionEventKind {
    pub const ALL: [PositionEventKind; 20] = [
        PositionEventKind::Transaction,
        PositionEventKind::Dividend,
        PositionEventKind::Interest,
        PositionEventKind::Fee,
        PositionEventKind::Tax,
        PositionEventKind::StockSplit,
        PositionEventKind::StockMerge,
        PositionEventKind::StockSpinoff,
        PositionEventKind::StockDividend,
        PositionEventKind::StockBonus,
        PositionEventKind::StockRights,
        PositionEventKind::StockBuyback,
        PositionEventKind::StockConversion,
        PositionEventKind::StockReclassification,
        PositionEventKind::StockReorganization,
        PositionEventKind::StockLiquidation,
        PositionEventKind::StockOther,
        PositionEventKind::StockEvent,
        PositionEventKind::Stock,
        PositionEventKind::Bond,
    ];

    /// 資料庫與 JSON 中使用的名稱
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionEventKind::Transaction => "transaction",
            PositionEventKind::Dividend => "dividend",
            PositionEventKind::Interest => "interest",
            PositionEventKind::Fee => "fee",
            PositionEventKind::Tax => "tax",
            PositionEventKind::StockSplit => "stock_split",
            PositionEventKind::StockMerge => "stock_merge",
            PositionEventKind::StockSpinoff => "stock_spinoff",
            PositionEventKind::StockDividend => "stock_dividend",
            PositionEventKind::StockBonus => "stock_bonus",
            PositionEventKind::StockRights => "stock_rights",
            PositionEventKind::StockBuyback => "stock_buyback",
            PositionEventKind::StockConversion => "stock_conversion",
            PositionEventKind::StockReclassification => "stock_reclassification",
            PositionEventKind::StockReorganization => "stock_reorganization",
            PositionEventKind::StockLiquidation => "stock_liquidation",
            PositionEventKind::StockOther => "stock_other",
            PositionEventKind::StockEvent => "stock_event",
            PositionEventKind::Stock => "stock",
            PositionEventKind::Bond => "bond",
        }
    }

    pub fn measure(&self) -> EventMeasure {
        match self {
            PositionEventKind::Transaction => EventMeasure::Trade,
            PositionEventKind::Dividend
            | PositionEventKind::Interest
            | PositionEventKind::Fee
            | PositionEventKind::Tax => EventMeasure::Amount,
            _ => EventMeasure::Ratio,
        }
    }
}

impl fmt::Display for PositionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PositionEventKind {
    type Err = EventShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PositionEventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EventShapeError::UnknownKind(s.to_string()))
    }
}

/// 依事件類型攜帶的數值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDetails {
    Trade {
        quantity: i64,
        price: f64,
        #[serde(rename = "type")]
        transaction_type: String,
        commission: f64,
        fees: f64,
    },
    Amount {
        amount: f64,
    },
    Ratio {
        ratio: f64,
    },
}

impl EventDetails {
    pub fn measure(&self) -> EventMeasure {
        match self {
            EventDetails::Trade { .. } => EventMeasure::Trade,
            EventDetails::Amount { .. } => EventMeasure::Amount,
            EventDetails::Ratio { .. } => EventMeasure::Ratio,
        }
    }
}

/// 事件欄位與類型不符
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventShapeError {
    #[error("unknown event kind `{0}`")]
    UnknownKind(String),

    #[error("field `{field}` is required for {kind} events")]
    MissingField {
        kind: PositionEventKind,
        field: &'static str,
    },

    #[error("field `{field}` is not valid for {kind} events")]
    UnexpectedField {
        kind: PositionEventKind,
        field: &'static str,
    },
}

/// 未經檢查的事件欄位，所有數值皆為可選
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFields {
    pub amount: Option<f64>,
    pub ratio: Option<f64>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub commission: Option<f64>,
    pub fees: Option<f64>,
}

impl EventFields {
    /// 依事件類型挑出需要的欄位，缺少或多出欄位皆視為錯誤
    pub fn into_details(self, kind: PositionEventKind) -> Result<EventDetails, EventShapeError> {
        let present = [
            ("amount", self.amount.is_some()),
            ("ratio", self.ratio.is_some()),
            ("quantity", self.quantity.is_some()),
            ("price", self.price.is_some()),
            ("type", self.transaction_type.is_some()),
            ("commission", self.commission.is_some()),
            ("fees", self.fees.is_some()),
        ];
        let allowed: &[&str] = match kind.measure() {
            EventMeasure::Trade => &["quantity", "price", "type", "commission", "fees"],
            EventMeasure::Amount => &["amount"],
            EventMeasure::Ratio => &["ratio"],
        };
        if let Some((field, _)) = present
            .iter()
            .find(|(field, is_set)| *is_set && !allowed.contains(field))
        {
            return Err(EventShapeError::UnexpectedField {
                kind,
                field: *field,
            });
        }

        let missing = |field: &'static str| EventShapeError::MissingField { kind, field };
        let details = match kind.measure() {
            EventMeasure::Trade => EventDetails::Trade {
                quantity: self.quantity.ok_or_else(|| missing("quantity"))?,
                price: self.price.ok_or_else(|| missing("price"))?,
                transaction_type: self.transaction_type.ok_or_else(|| missing("type"))?,
                commission: self.commission.ok_or_else(|| missing("commission"))?,
                fees: self.fees.ok_or_else(|| missing("fees"))?,
            },
            EventMeasure::Amount => EventDetails::Amount {
                amount: self.amount.ok_or_else(|| missing("amount"))?,
            },
            EventMeasure::Ratio => EventDetails::Ratio {
                ratio: self.ratio.ok_or_else(|| missing("ratio"))?,
            },
        };
        Ok(details)
    }
}

impl From<&EventDetails> for EventFields {
    fn from(details: &EventDetails) -> Self {
        match details {
            EventDetails::Trade {
                quantity,
                price,
                transaction_type,
                commission,
                fees,
            } => EventFields {
                quantity: Some(*quantity),
                price: Some(*price),
                transaction_type: Some(transaction_type.clone()),
                commission: Some(*commission),
                fees: Some(*fees),
                ..Default::default()
            },
            EventDetails::Amount { amount } => EventFields {
                amount: Some(*amount),
                ..Default::default()
            },
            EventDetails::Ratio { ratio } => EventFields {
                ratio: Some(*ratio),
                ..Default::default()
            },
        }
    }
}

/// 持倉事件模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEvent {
    pub id: i64,
    pub position_id: i64,
    pub kind: PositionEventKind,
    pub date: String,
    pub notes: String,
    #[serde(flatten)]
    pub details: EventDetails,
}

/// 持倉事件插入模型，kind 與 details 必須一致
#[derive(Debug, Clone, PartialEq)]
pub struct PositionEventInsert {
    kind: PositionEventKind,
    date: String,
    notes: String,
    details: EventDetails,
}

impl PositionEventInsert {
    pub fn new(
        kind: PositionEventKind,
        date: impl Into<String>,
        notes: impl Into<String>,
        details: EventDetails,
    ) -> Result<Self, EventShapeError> {
        if details.measure() != kind.measure() {
            let field = match details.measure() {
                EventMeasure::Trade => "quantity",
                EventMeasure::Amount => "amount",
                EventMeasure::Ratio => "ratio",
            };
            return Err(EventShapeError::UnexpectedField { kind, field });
        }
        Ok(Self {
            kind,
            date: date.into(),
            notes: notes.into(),
            details,
        })
    }

    pub fn kind(&self) -> PositionEventKind {
        self.kind
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn details(&self) -> &EventDetails {
        &self.details
    }
}
