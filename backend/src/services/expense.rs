//! Expense allocation service
//!
//! An expense is an outgoing stock movement booked against a project. The
//! stock decrement, the expense record and the history entry are written
//! inside one critical section; validation runs before any of them, so a
//! rejected call applies nothing.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{
    CreateExpenseInput, Expense, ExpenseFilter, ExpenseSummary, HistoryAction, HistoryEntry,
    UpdateExpenseInput,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{ReferenceKind, Store};

/// Expense allocation service
#[derive(Clone)]
pub struct ExpenseService {
    store: Store,
}

impl ExpenseService {
    /// Create a new ExpenseService instance
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Allocate stock to a project
    pub fn create(&self, input: CreateExpenseInput) -> AppResult<Expense> {
        let mut state = self.store.write();

        let product = state
            .product(input.product_id)
            .cloned()
            .ok_or_else(|| AppError::validation("product", "Invalid product selection"))?;
        let project = state
            .project(input.project_id)
            .cloned()
            .ok_or_else(|| AppError::validation("project", "Invalid project selection"))?;
        let date = input
            .date
            .ok_or_else(|| AppError::validation("date", "Date is required"))?;
        if input.quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }

        let (before, after) = state.allocate_stock(product.id, input.quantity)?;

        let reference = state.next_reference(ReferenceKind::Expense);
        let user = input
            .user
            .unwrap_or_else(|| state.settings.user_profile.name.clone());
        let total_cost = product.cost_price * Decimal::from(input.quantity);

        let expense = Expense {
            id: Uuid::new_v4(),
            project_id: project.id,
            project_name: project.name.clone(),
            article: product.article.clone(),
            product_name: product.name.clone(),
            quantity: input.quantity,
            unit_cost: product.cost_price,
            total_cost,
            date,
            reference: reference.clone(),
            created_at: Utc::now(),
        };
        state.expenses.push(expense.clone());

        let mut details = BTreeMap::new();
        details.insert("expense_date".to_string(), date.to_string());
        details.insert("project_code".to_string(), project.code.clone());

        state.history.push(HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: HistoryAction::Outgoing,
            article: product.article,
            product_name: product.name,
            quantity_before: before,
            quantity_after: after,
            quantity_change: -input.quantity,
            reserved_quantity: None,
            cost: expense.unit_cost,
            total_cost: expense.total_cost,
            user,
            project: Some(project.name),
            reference: format!("Expense #{}", reference),
            comments: None,
            details,
        });

        Ok(expense)
    }

    /// Update an expense, applying the stock difference
    pub fn update(&self, expense_id: Uuid, input: UpdateExpenseInput) -> AppResult<Expense> {
        let mut state = self.store.write();

        let original = state
            .expenses
            .iter()
            .find(|e| e.id == expense_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        let product = state
            .product_by_article(&original.article)
            .cloned()
            .ok_or_else(|| AppError::validation("product", "Invalid product selection"))?;

        let project = match input.project_id {
            Some(project_id) => state
                .project(project_id)
                .cloned()
                .ok_or_else(|| AppError::validation("project", "Invalid project selection"))?,
            None => state
                .project(original.project_id)
                .cloned()
                .ok_or_else(|| AppError::validation("project", "Invalid project selection"))?,
        };

        let new_quantity = input.quantity.unwrap_or(original.quantity);
        if new_quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }
        let date = input.date.unwrap_or(original.date);

        // Positive difference takes more stock, negative gives it back
        let stock_difference = new_quantity - original.quantity;
        let quantities = if stock_difference > 0 {
            Some(state.allocate_stock(product.id, stock_difference)?)
        } else if stock_difference < 0 {
            Some(state.reverse_allocation(product.id, -stock_difference)?)
        } else {
            None
        };

        let total_cost = product.cost_price * Decimal::from(new_quantity);
        let user = input
            .user
            .unwrap_or_else(|| state.settings.user_profile.name.clone());

        let expense = state
            .expenses
            .iter_mut()
            .find(|e| e.id == expense_id)
            .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;
        expense.project_id = project.id;
        expense.project_name = project.name.clone();
        expense.quantity = new_quantity;
        expense.unit_cost = product.cost_price;
        expense.total_cost = total_cost;
        expense.date = date;
        let updated = expense.clone();

        if let Some((before, after)) = quantities {
            state.history.push(HistoryEntry {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                action: HistoryAction::Outgoing,
                article: updated.article.clone(),
                product_name: updated.product_name.clone(),
                quantity_before: before,
                quantity_after: after,
                quantity_change: -stock_difference,
                reserved_quantity: None,
                cost: updated.unit_cost,
                total_cost: updated.total_cost,
                user,
                project: Some(project.name),
                reference: format!("Expense #{}", updated.reference),
                comments: Some(format!(
                    "Expense quantity changed from {} to {}",
                    original.quantity, new_quantity
                )),
                details: BTreeMap::new(),
            });
        }

        Ok(updated)
    }

    /// Delete an expense and restore its quantity to stock
    pub fn delete(&self, expense_id: Uuid, user: Option<String>) -> AppResult<()> {
        let mut state = self.store.write();

        let expense = state
            .expenses
            .iter()
            .find(|e| e.id == expense_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        let product_id = state
            .product_by_article(&expense.article)
            .map(|p| p.id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let (before, after) = state.reverse_allocation(product_id, expense.quantity)?;
        state.expenses.retain(|e| e.id != expense_id);

        let user = user.unwrap_or_else(|| state.settings.user_profile.name.clone());
        state.history.push(HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: HistoryAction::Outgoing,
            article: expense.article.clone(),
            product_name: expense.product_name.clone(),
            quantity_before: before,
            quantity_after: after,
            quantity_change: expense.quantity,
            reserved_quantity: None,
            cost: expense.unit_cost,
            total_cost: expense.total_cost,
            user,
            project: Some(expense.project_name.clone()),
            reference: format!("Expense #{}", expense.reference),
            comments: Some("Expense deleted, stock restored".to_string()),
            details: BTreeMap::new(),
        });

        Ok(())
    }

    /// Get one expense
    pub fn get(&self, expense_id: Uuid) -> AppResult<Expense> {
        let state = self.store.read();
        state
            .expenses
            .iter()
            .find(|e| e.id == expense_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Expense".to_string()))
    }

    /// Filtered listing, newest date first; ties keep insertion order
    pub fn list(&self, filter: &ExpenseFilter) -> Vec<Expense> {
        let state = self.store.read();
        let mut expenses: Vec<Expense> = state
            .expenses
            .iter()
            .filter(|e| matches_filter(e, filter))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses
    }

    /// Aggregates over the filtered listing
    pub fn summary(&self, filter: &ExpenseFilter) -> ExpenseSummary {
        let state = self.store.read();
        let mut summary = ExpenseSummary {
            total_value: Decimal::ZERO,
            items_allocated: 0,
            record_count: 0,
        };
        for expense in state.expenses.iter().filter(|e| matches_filter(e, filter)) {
            summary.total_value += expense.total_cost;
            summary.items_allocated += expense.quantity;
            summary.record_count += 1;
        }
        summary
    }
}

fn matches_filter(expense: &Expense, filter: &ExpenseFilter) -> bool {
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !expense.article.to_lowercase().contains(&needle)
            && !expense.product_name.to_lowercase().contains(&needle)
            && !expense.project_name.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if let Some(project_id) = filter.project_id {
        if expense.project_id != project_id {
            return false;
        }
    }
    if let Some(date_from) = filter.date_from {
        if expense.date < date_from {
            return false;
        }
    }
    if let Some(date_to) = filter.date_to {
        if expense.date > date_to {
            return false;
        }
    }
    true
}
