use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::errors::DomainError;

use super::dto::{OrderDto, OrderFlatRow, OrderItemDto, SimpleOrderDto};

/// Attaches order lines to their roots. Roots keep their given order and
/// lines keep their relative order within each root. A line whose order id is
/// not among the roots means the two inputs did not come from the same root
/// set, which is reported as an invariant violation.
pub fn regroup(
    roots: Vec<SimpleOrderDto>,
    lines: Vec<OrderItemDto>,
) -> Result<Vec<OrderDto>, DomainError> {
    let index: HashMap<Uuid, usize> = roots
        .iter()
        .enumerate()
        .map(|(i, r)| (r.order_id, i))
        .collect();
    let mut grouped: Vec<Vec<OrderItemDto>> = vec![Vec::new(); roots.len()];

    for line in lines {
        let Some(&slot) = index.get(&line.order_id) else {
            return Err(DomainError::InvariantViolation(format!(
                "order line references order {} outside the root set",
                line.order_id
            )));
        };
        grouped[slot].push(line);
    }

    Ok(roots
        .into_iter()
        .zip(grouped)
        .map(|(root, items)| OrderDto::new(root, items))
        .collect())
}

/// Rebuilds nested orders from flat rows. Roots appear in the order their
/// first row appears.
pub fn regroup_flat(rows: Vec<OrderFlatRow>) -> Result<Vec<OrderDto>, DomainError> {
    let mut roots: Vec<SimpleOrderDto> = Vec::new();
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut lines = Vec::with_capacity(rows.len());

    for row in &rows {
        if seen.insert(row.order_id) {
            roots.push(row.header());
        }
        lines.push(row.line());
    }

    regroup(roots, lines)
}

/// Collapses the root duplication a collection join produces: each order
/// appears once, carrying every line that was joined to it.
pub fn dedup_joined(rows: Vec<OrderFlatRow>) -> Vec<OrderDto> {
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut out: Vec<OrderDto> = Vec::new();

    for row in rows {
        let line = row.line();
        match index.get(&row.order_id) {
            Some(&i) => out[i].items.push(line),
            None => {
                index.insert(row.order_id, out.len());
                out.push(OrderDto::new(row.header(), vec![line]));
            }
        }
    }
    out
}
