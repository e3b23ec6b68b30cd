use serde::{ Serialize, Deserialize };
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize)]
pub struct ChatbotRequest {
    pub message: String,
}

/// Nested payload that decodes into `T` when it fits, and is kept as raw JSON
/// otherwise. Either way the field counts as present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Typed(T),
    Raw(JsonValue),
}

impl<T> Payload<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Payload::Typed(value) => Some(value),
            Payload::Raw(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_details: Option<Payload<TransactionDetails>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_data: Option<Payload<ReportData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_info: Option<Payload<Vec<ParentInfo>>>,
}

impl ChatbotResponse {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            transaction_details: None,
            report_data: None,
            parent_info: None,
        }
    }

    /// A transaction happened server-side (sale, recharge or registration).
    pub fn has_transaction(&self) -> bool {
        self.transaction_details.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Sale,
    Recharge,
    Registration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Pix,
    Dinheiro,
    Fiado,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub total_sales: f64,
    pub product_summary: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParentTransaction {
    pub date: String,
    pub product: String,
    pub total: f64,
    pub payment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParentInfo {
    pub name: String,
    pub grade: String,
    pub balance: f64,
    pub transactions: Vec<ParentTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sale_with_typed_details() {
        let body = r#"{
            "response": "Venda registrada",
            "transactionDetails": {
                "type": "sale",
                "studentName": "Ana",
                "amount": 10,
                "product": "Salgado grande",
                "paymentMethod": "Pix",
                "newBalance": 35.5
            }
        }"#;
        let parsed: ChatbotResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.response, "Venda registrada");
        assert!(parsed.has_transaction());
        let details = parsed.transaction_details.as_ref().and_then(Payload::typed).unwrap();
        assert_eq!(details.kind, TransactionKind::Sale);
        assert_eq!(details.student_name.as_deref(), Some("Ana"));
        assert_eq!(details.payment_method, Some(PaymentMethod::Pix));
        assert_eq!(details.new_balance, Some(35.5));
    }

    #[test]
    fn null_details_count_as_absent() {
        let parsed: ChatbotResponse = serde_json
            ::from_str(r#"{"response":"ok","transactionDetails":null}"#)
            .unwrap();
        assert!(!parsed.has_transaction());
    }

    #[test]
    fn unknown_detail_shape_still_counts_as_transaction() {
        let parsed: ChatbotResponse = serde_json
            ::from_str(r#"{"response":"ok","transactionDetails":{"type":"refund","x":1}}"#)
            .unwrap();
        assert!(parsed.has_transaction());
        assert!(matches!(parsed.transaction_details, Some(Payload::Raw(_))));
    }

    #[test]
    fn report_and_parent_payloads_are_accepted() {
        let body = r#"{
            "response": "Relatório do dia",
            "reportData": { "totalSales": 120, "productSummary": { "Bolo de pote": 3 } },
            "parentInfo": [{
                "name": "Ana", "grade": "5A", "balance": 12,
                "transactions": [{ "date": "2024-05-01", "product": "Bolo de pote", "total": 12, "payment": "Fiado" }]
            }]
        }"#;
        let parsed: ChatbotResponse = serde_json::from_str(body).unwrap();

        assert!(!parsed.has_transaction());
        let report = parsed.report_data.as_ref().and_then(Payload::typed).unwrap();
        assert_eq!(report.product_summary.get("Bolo de pote"), Some(&3.0));
        let parents = parsed.parent_info.as_ref().and_then(Payload::typed).unwrap();
        assert_eq!(parents[0].transactions.len(), 1);
    }

    #[test]
    fn missing_response_is_malformed() {
        assert!(serde_json::from_str::<ChatbotResponse>(r#"{"transactionDetails":{}}"#).is_err());
        assert!(serde_json::from_str::<ChatbotResponse>(r#"{"response":42}"#).is_err());
    }

    #[test]
    fn request_serializes_message_field() {
        let req = ChatbotRequest { message: "  salgado grande ".to_string() };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"  salgado grande "}"#);
    }
}
