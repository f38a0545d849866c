// In crates/api-client/src/types.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Helius parsed transactions ---

/// One entry of `GET /v0/addresses/{address}/transactions`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeliusTransaction {
    pub signature: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub source: String,
    /// Lamports.
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub transaction_error: Option<Value>,
    #[serde(default)]
    pub native_transfers: Vec<NativeTransfer>,
    #[serde(default)]
    pub token_transfers: Vec<HeliusTokenTransfer>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub events: TransactionEvents,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransfer {
    #[serde(default)]
    pub from_user_account: String,
    #[serde(default)]
    pub to_user_account: String,
    /// Lamports.
    #[serde(default)]
    pub amount: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeliusTokenTransfer {
    #[serde(default)]
    pub from_user_account: String,
    #[serde(default)]
    pub to_user_account: String,
    pub mint: String,
    /// Already scaled by the token's decimals.
    #[serde(default)]
    pub token_amount: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    #[serde(default)]
    pub program_id: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TransactionEvents {
    #[serde(default)]
    pub swap: Option<SwapEventRaw>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SwapEventRaw {
    #[serde(default)]
    pub native_input: Option<NativeAmount>,
    #[serde(default)]
    pub native_output: Option<NativeAmount>,
    #[serde(default)]
    pub token_inputs: Vec<TokenAmount>,
    #[serde(default)]
    pub token_outputs: Vec<TokenAmount>,
    #[serde(default)]
    pub inner_swaps: Vec<InnerSwap>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NativeAmount {
    #[serde(default)]
    pub account: String,
    /// Lamports, sent as a string by Helius.
    #[serde(default)]
    pub amount: Value,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub mint: String,
    #[serde(default)]
    pub raw_token_amount: RawTokenAmount,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenAmount {
    #[serde(default)]
    pub token_amount: String,
    #[serde(default)]
    pub decimals: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct InnerSwap {
    #[serde(default)]
    pub program_info: Option<ProgramInfo>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProgramInfo {
    #[serde(default)]
    pub source: String,
}

// --- Helius balances ---

/// Response of `GET /v0/addresses/{address}/balances`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeliusBalances {
    #[serde(default)]
    pub native_balance: u64,
    #[serde(default)]
    pub tokens: Vec<HeliusTokenBalance>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HeliusTokenBalance {
    pub mint: String,
    /// Raw units.
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub decimals: u32,
}

// --- Solana JSON-RPC ---

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RpcValue<T> {
    pub value: T,
}

// --- Language models ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}

#[derive(Debug, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}
