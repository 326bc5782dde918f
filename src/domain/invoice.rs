use serde::{Deserialize, Serialize};

use super::fund::Currency;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub total: f64,
}

impl Invoice {
    /// Totals are derived, never authoritative: recomputed on every create
    /// or update that touches the items or the tax rate.
    pub fn recompute_totals(&mut self) {
        self.subtotal = self
            .items
            .iter()
            .map(|item| item.quantity * item.unit_price)
            .sum();
        self.tax_amount = self.subtotal * self.tax_rate / 100.0;
        self.total = self.subtotal + self.tax_amount;
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub client_id: Option<String>,
    pub number: Option<String>,
    pub status: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub tax_rate: Option<f64>,
}

impl InvoicePatch {
    pub fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.number.is_none()
            && self.status.is_none()
            && self.items.is_none()
            && self.tax_rate.is_none()
    }

    pub fn apply(self, invoice: &mut Invoice) {
        let touches_totals = self.items.is_some() || self.tax_rate.is_some();
        if let Some(client_id) = self.client_id {
            invoice.client_id = Some(client_id);
        }
        if let Some(number) = self.number {
            invoice.number = Some(number);
        }
        if let Some(status) = self.status {
            invoice.status = status;
        }
        if let Some(items) = self.items {
            invoice.items = items;
        }
        if let Some(tax_rate) = self.tax_rate {
            invoice.tax_rate = tax_rate;
        }
        if touches_totals {
            invoice.recompute_totals();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Invoice, InvoicePatch, LineItem};

    fn invoice_with(items: Vec<LineItem>, tax_rate: f64) -> Invoice {
        let mut invoice = Invoice {
            id: "i1".to_string(),
            created_at: "2026-03-01T10:00:00Z".to_string(),
            project_id: "p1".to_string(),
            client_id: None,
            number: None,
            status: "draft".to_string(),
            currency: None,
            items,
            tax_rate,
            subtotal: 0.0,
            tax_amount: 0.0,
            total: 0.0,
        };
        invoice.recompute_totals();
        invoice
    }

    fn item(quantity: f64, unit_price: f64) -> LineItem {
        LineItem {
            description: String::new(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn totals_derive_from_items_and_tax_rate() {
        let invoice = invoice_with(vec![item(2.0, 100.0), item(1.0, 50.0)], 10.0);
        assert_eq!(invoice.subtotal, 250.0);
        assert_eq!(invoice.tax_amount, 25.0);
        assert_eq!(invoice.total, 275.0);
    }

    #[test]
    fn empty_invoice_totals_are_zero() {
        let invoice = invoice_with(Vec::new(), 15.0);
        assert_eq!(invoice.subtotal, 0.0);
        assert_eq!(invoice.tax_amount, 0.0);
        assert_eq!(invoice.total, 0.0);
    }

    #[test]
    fn patch_touching_items_recomputes_totals() {
        let mut invoice = invoice_with(vec![item(1.0, 100.0)], 0.0);
        let patch = InvoicePatch {
            items: Some(vec![item(3.0, 10.0)]),
            tax_rate: Some(10.0),
            ..InvoicePatch::default()
        };
        patch.apply(&mut invoice);
        assert_eq!(invoice.subtotal, 30.0);
        assert_eq!(invoice.tax_amount, 3.0);
        assert_eq!(invoice.total, 33.0);
    }

    #[test]
    fn patch_without_items_or_tax_keeps_totals() {
        let mut invoice = invoice_with(vec![item(2.0, 100.0)], 10.0);
        let patch = InvoicePatch {
            status: Some("sent".to_string()),
            ..InvoicePatch::default()
        };
        patch.apply(&mut invoice);
        assert_eq!(invoice.status, "sent");
        assert_eq!(invoice.total, 220.0);
    }
}
