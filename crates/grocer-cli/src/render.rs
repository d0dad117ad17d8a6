//! Plain-text rendering for command output.

use std::fmt::Write as _;

use grocer_core::{
  list::ListView,
  price::{PriceRecord, title_case},
  rank::RankedRecord,
  suggest::Suggestions,
  unit::Rates,
};

/// `$4.99/kg  $2.26/lb` or `$0.50/ct`.
pub fn rates(rates: &Rates) -> String {
  match rates {
    Rates::Weight { per_kilogram, per_pound } => {
      format!("${per_kilogram:.2}/kg  ${per_pound:.2}/lb")
    }
    Rates::Count { per_count } => format!("${per_count:.2}/ct"),
  }
}

/// One catalog record on a single line.
pub fn record(r: &PriceRecord) -> String {
  let brand = r.brand.as_deref().map(|b| format!(" ({b})")).unwrap_or_default();
  format!(
    "{}{} @ {}  ${:.2} for {} {}  [{}]  {}",
    r.item_name,
    brand,
    r.store_display(),
    r.price,
    r.weight_value,
    r.weight_unit,
    rates(&r.rates),
    r.id,
  )
}

/// Ranked hits, cheapest first; the best value is starred.
pub fn ranked(hits: &[RankedRecord]) -> String {
  if hits.is_empty() {
    return "no matches\n".to_string();
  }
  let mut out = String::new();
  for hit in hits {
    let mark = if hit.best_value { '*' } else { ' ' };
    let _ = writeln!(out, "{mark} {}", record(&hit.record));
  }
  out
}

pub fn suggestions(s: &Suggestions) -> String {
  let stores: Vec<String> = s.stores.iter().map(|st| title_case(st)).collect();
  format!("stores: {}\nbrands: {}\n", stores.join(", "), s.brands.join(", "))
}

/// The shopping list, one block per store.
pub fn list(view: &ListView) -> String {
  let mut out = String::new();
  for (store, entries) in &view.groups {
    let _ = writeln!(out, "{}", title_case(store));
    for e in entries {
      let check = if e.is_bought { 'x' } else { ' ' };
      let price = if e.estimated_price > 0.0 {
        format!("  ~${:.2}", e.estimated_price)
      } else {
        String::new()
      };
      let _ = writeln!(out, "  [{check}] {}{price}  {}", e.item_name, e.id);
    }
  }
  let _ = writeln!(out, "{} item(s) left to buy", view.pending);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::Utc;
  use grocer_core::{
    list::ShoppingListEntry,
    price::NewPriceRecord,
    unit::WeightUnit,
  };
  use uuid::Uuid;

  fn rec(store: &str, item: &str, price: f64, w: f64, unit: WeightUnit) -> PriceRecord {
    PriceRecord::build(Uuid::new_v4(), Utc::now(), NewPriceRecord::new(store, item, price, w, unit))
      .unwrap()
  }

  #[test]
  fn weight_rates_show_both_units() {
    let r = rec("costco", "Rice", 10.0, 2.0, WeightUnit::Kilogram);
    assert_eq!(rates(&r.rates), "$5.00/kg  $2.27/lb");
  }

  #[test]
  fn count_rates_show_per_count() {
    let r = rec("costco", "Eggs", 6.0, 12.0, WeightUnit::Count);
    assert_eq!(rates(&r.rates), "$0.50/ct");
  }

  #[test]
  fn record_title_cases_store() {
    let r = rec("whole foods", "Rice", 10.0, 2.0, WeightUnit::Kilogram);
    assert!(record(&r).contains("@ Whole Foods"));
  }

  #[test]
  fn only_best_value_is_starred() {
    let hits = vec![
      RankedRecord { record: rec("a", "Rice", 4.0, 2.0, WeightUnit::Kilogram), best_value: true },
      RankedRecord { record: rec("b", "Rice", 10.0, 2.0, WeightUnit::Kilogram), best_value: false },
    ];
    let out = ranked(&hits);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("* "));
    assert!(lines[1].starts_with("  "));
  }

  #[test]
  fn empty_hits_say_so() {
    assert_eq!(ranked(&[]), "no matches\n");
  }

  #[test]
  fn list_groups_and_counts() {
    let entry = |name: &str, store: Option<&str>, bought: bool| ShoppingListEntry {
      id:              Uuid::new_v4(),
      item_name:       name.to_string(),
      store_name:      store.map(str::to_string),
      estimated_price: 0.0,
      is_bought:       bought,
      created_at:      Utc::now(),
    };
    let view = ListView::build(vec![
      entry("Milk", None, false),
      entry("Rice", Some("costco"), true),
    ]);
    let out = list(&view);
    assert!(out.contains("Costco\n  [x] Rice"));
    assert!(out.contains("Generic List\n  [ ] Milk"));
    assert!(out.ends_with("1 item(s) left to buy\n"));
  }
}
