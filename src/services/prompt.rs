use crate::models::PortfolioTable;

/// Aggregate purchase and current value of a row set, each rounded to two
/// decimal places: `(Σ purchase_price × quantity, Σ current_price × quantity)`.
pub fn summarize_portfolio(table: &PortfolioTable) -> (f64, f64) {
    let mut total_purchase = 0.0;
    let mut total_current = 0.0;
    for tagged in table.rows() {
        total_purchase += tagged.row.purchase_price * tagged.row.quantity;
        total_current += tagged.row.current_price * tagged.row.quantity;
    }
    (round2(total_purchase), round2(total_current))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds the completion prompt for one user turn: the analyst instruction,
/// the filtered rows as CSV (no truncation), both aggregate totals, and the
/// literal user question. Pure and deterministic.
pub fn build_prompt(table: &PortfolioTable, portfolio_name: &str, user_query: &str) -> String {
    let (total_purchase, total_current) = summarize_portfolio(table);
    let preview = table.to_csv();

    format!(
        r#"
You are a professional financial analyst. You are given all stock-level data for the portfolio named "{portfolio_name}". Use this complete information to answer the user's question intelligently.
Now respond to the user's question politely. Keep it conversational, concise, and helpful - like you're chatting with them directly. Avoid over-explaining, and skip any redundant analysis unless asked.
If the user just greets you (e.g., says "hello", "how are you", etc.), feel free to respond casually - like "Hi there! How can I help you with your portfolio today?"

Avoid repeating data unless asked. Just be helpful, human-like, and straight to the point.
Here is the full portfolio data:
{preview}

- Total Purchase Value (quantity x purchase_price): ${total_purchase:.2}
- Total Current Value (quantity x current_price): ${total_current:.2}

Now answer the question below clearly and accurately based ONLY on the data above:

User's Question:
{user_query}
Respond in a structured manner.
"#
    )
}
