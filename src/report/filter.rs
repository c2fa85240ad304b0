//! Narrows canonical tables by period, branch membership and search token.
//! Filtering never mutates its input; it always yields a fresh vector.

use crate::models::{OrderSale, ProductSale};
use chrono::NaiveDate;
use std::collections::BTreeSet;

// ── Criteria ──────────────────────────────────────────────────────────────────

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub period: Option<DateRange>,

    /// Branches to keep. `None` means the record type has no branch column;
    /// `Some(empty)` keeps nothing — every branch box unticked is a valid
    /// selection that yields an empty report.
    pub branches: Option<BTreeSet<String>>,

    /// Free-text token; whitespace-collapsed before matching. Blank tokens
    /// are ignored.
    pub search: Option<String>,
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_token(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Row predicates ────────────────────────────────────────────────────────────

pub trait Filterable {
    fn order_date(&self) -> Option<NaiveDate>;

    fn branch(&self) -> Option<&str> {
        None
    }

    fn matches_search(&self, _token: &str) -> bool {
        true
    }
}

impl Filterable for ProductSale {
    fn order_date(&self) -> Option<NaiveDate> {
        self.data_pedido
    }

    /// OR semantics, recall-favoring: case-insensitive substring against the
    /// whitespace-normalized description, or exact trimmed match against the
    /// product code. Users usually know either a partial name or a full code.
    fn matches_search(&self, token: &str) -> bool {
        let descricao = normalize_token(&self.descricao).to_lowercase();
        descricao.contains(&token.to_lowercase()) || self.codigo_produto.trim() == token
    }
}

impl Filterable for OrderSale {
    fn order_date(&self) -> Option<NaiveDate> {
        self.data
    }

    fn branch(&self) -> Option<&str> {
        Some(&self.filial)
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Rows with a null date never pass a period check.
pub fn apply<T: Filterable + Clone>(rows: &[T], criteria: &FilterCriteria) -> Vec<T> {
    let token = criteria
        .search
        .as_deref()
        .map(normalize_token)
        .filter(|t| !t.is_empty());

    rows.iter()
        .filter(|row| {
            if let Some(period) = &criteria.period {
                match row.order_date() {
                    Some(date) if period.contains(date) => {}
                    _ => return false,
                }
            }

            if let Some(branches) = &criteria.branches {
                match row.branch() {
                    Some(branch) if branches.contains(branch) => {}
                    _ => return false,
                }
            }

            if let Some(token) = &token {
                if !row.matches_search(token) {
                    return false;
                }
            }

            true
        })
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(descricao: &str, codigo: &str, date: Option<NaiveDate>) -> ProductSale {
        ProductSale {
            codigo_produto: codigo.to_string(),
            descricao: descricao.to_string(),
            data_pedido: date,
            quantidade: 1.0,
            preco_venda: 10.0,
            custo: 5.0,
            valor_total_vendido: 10.0,
            margem_lucro: 5.0,
            ano: date.map(|d| chrono::Datelike::year(&d)),
            mes: date.map(|d| chrono::Datelike::month(&d)),
        }
    }

    fn order(date: Option<NaiveDate>, filial: &str) -> OrderSale {
        OrderSale {
            data: date,
            valor_total: 100.0,
            numero_pedido: "1".to_string(),
            codigo_cliente: "1".to_string(),
            vendedor: "JOAO".to_string(),
            filial: filial.to_string(),
        }
    }

    #[test]
    fn test_date_range_is_an_exhaustive_inclusive_partition() {
        let rows: Vec<ProductSale> = (1..=10)
            .map(|d| sale("A", "1", Some(ymd(2024, 1, d))))
            .collect();
        let period = DateRange::new(ymd(2024, 1, 3), ymd(2024, 1, 7));

        let kept = apply(
            &rows,
            &FilterCriteria {
                period: Some(period),
                ..Default::default()
            },
        );

        assert_eq!(kept.len(), 5);
        assert!(kept.iter().all(|r| period.contains(r.data_pedido.unwrap())));
        // Boundary days are both included.
        assert!(kept.iter().any(|r| r.data_pedido == Some(ymd(2024, 1, 3))));
        assert!(kept.iter().any(|r| r.data_pedido == Some(ymd(2024, 1, 7))));
    }

    #[test]
    fn test_null_dates_never_pass_a_period_check() {
        let rows = vec![sale("A", "1", None), sale("B", "2", Some(ymd(2024, 1, 5)))];
        let kept = apply(
            &rows,
            &FilterCriteria {
                period: Some(DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31))),
                ..Default::default()
            },
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].descricao, "B");
    }

    #[test]
    fn test_search_or_semantics() {
        let rows = vec![
            sale("Vinho  Tinto   Reserva", "1234", Some(ymd(2024, 1, 1))),
            sale("Espumante Branco", "9999", Some(ymd(2024, 1, 1))),
        ];

        let by = |needle: &str| {
            apply(
                &rows,
                &FilterCriteria {
                    search: Some(needle.to_string()),
                    ..Default::default()
                },
            )
        };

        // Case-insensitive substring on the normalized description.
        assert_eq!(by("tinto").len(), 1);
        assert_eq!(by("tinto reserva").len(), 1);
        // Exact code match.
        assert_eq!(by("1234").len(), 1);
        // Token whitespace is normalized before matching.
        assert_eq!(by(" 1234 ").len(), 1);
        // Partial codes do not match.
        assert_eq!(by("123").len(), 0);
        // Blank token filters nothing.
        assert_eq!(by("   ").len(), 2);
    }

    #[test]
    fn test_branch_membership() {
        let rows = vec![
            order(Some(ymd(2024, 1, 1)), "1"),
            order(Some(ymd(2024, 1, 1)), "2"),
            order(Some(ymd(2024, 1, 1)), "3"),
        ];

        let keep_two: BTreeSet<String> = ["1", "3"].iter().map(|s| s.to_string()).collect();
        let kept = apply(
            &rows,
            &FilterCriteria {
                branches: Some(keep_two),
                ..Default::default()
            },
        );
        assert_eq!(kept.len(), 2);

        // Empty selection keeps nothing, by construction.
        let kept = apply(
            &rows,
            &FilterCriteria {
                branches: Some(BTreeSet::new()),
                ..Default::default()
            },
        );
        assert!(kept.is_empty());
    }
}
