use crate::models::Expense;

/// Whether an expense may still be edited or deleted.
///
/// Expenses stay open until a settlement covers them. Settlements are not
/// tracked yet, so every expense is mutable.
pub fn is_expense_mutable(_expense: &Expense) -> bool {
    true
}

/// Sum of all amounts, rounded to cents.
pub fn total(expenses: &[Expense]) -> f64 {
    (expenses.iter().map(|e| e.amount).sum::<f64>() * 100.0).round() / 100.0
}
