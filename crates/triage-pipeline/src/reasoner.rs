//! Diagnostic reasoner: prompt construction, the OpenAI-compatible
//! HTTP client, and the tolerant parse of whatever text comes back.

use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use triage_core::traits::Reasoner;
use triage_core::types::{Diagnosis, ReasonerAnswer};

/// Hard cap on follow-up questions, enforced at parse time rather than
/// trusting the model to honor the instruction.
const MAX_SYMPTOMS_TO_ASK: usize = 10;

/// Fixed Turkish system instructions. The reasoner must answer with a
/// single JSON object reusing the context's Score values for its
/// probability estimates.
pub const SYSTEM_PROMPT: &str = "Sen bir tıbbi NLP sistemisin. \
Aşağıdaki 'veri tabanı içeriği' hastalık, bölüm, belirtiler ve eşleşme skorları bilgisini içerir. \
Kullanıcı Türkçe olarak belirtilerini girecektir. \
Yanıtını **mutlaka JSON formatında ver** ve başka hiçbir metin ekleme. \
JSON yapısı şu şekilde olmalıdır (ÇİFT TIRNAK KULLAN): \
{ \"patient_symptoms\": [...], \"departments\": [...], \"symptoms_to_ask\": [...], \
\"disease_probabilities\": [{\"disease\": \"...\", \"probability\": 0.xx}], \"explanation\": \"...\" }\n\n\
Kurallar: \
1. 'patient_symptoms' alanında, normalize edilmiş kullanıcı belirtilerini listele. \
2. Eğer belirtiler tek bir departmanla yüksek güvenle eşleşiyorsa, 'departments' listesinde sadece o departmanı ver. \
3. Eğer belirtiler birden fazla departmanla benzer düzeyde eşleşiyorsa, 'departments' listesinde en ilgili departmanları ver. \
4. 'symptoms_to_ask' alanında, hastaya sorulabilecek ek belirtileri listele. \
   - Sadece hafif-orta şiddette belirtileri sor. \
   - Hastanın girmediği belirtileri sor. \
   - Maksimum 10 belirti. \
5. 'disease_probabilities' alanında, veri tabanı kayıtlarında verilen 'Score' değerlerini AYNEN kullan. \
   - Hastalıkları Score değerine göre azalan sırada listele. \
6. 'explanation' alanında kısa ve detaylı açıklama yap. \
7. MUTLAKA çift tırnak kullan, tek tırnak kullanma!";

/// Build the per-request user prompt from the rendered context block
/// and the joined normalized query.
pub fn user_prompt(context: &str, normalized_query: &str) -> String {
    format!("Veri tabanı kayıtları:\n{context}\n\nKullanıcının belirtileri: {normalized_query}")
}

/// Parse the reasoner's reply into the tagged answer. One syntactic
/// repair is attempted (single quotes to double quotes); anything
/// still unparseable degrades to `Unparsed` with the raw text, never
/// an error — the retrieval results remain valid without it.
pub fn parse_answer(raw: &str) -> ReasonerAnswer {
    let attempt = serde_json::from_str::<Diagnosis>(raw)
        .or_else(|_| serde_json::from_str::<Diagnosis>(&raw.replace('\'', "\"")));
    match attempt {
        Ok(mut diagnosis) => {
            diagnosis.symptoms_to_ask.truncate(MAX_SYMPTOMS_TO_ASK);
            ReasonerAnswer::Parsed(diagnosis)
        }
        Err(e) => {
            warn!(error = %e, "reasoner reply is not valid JSON, returning raw text");
            ReasonerAnswer::Unparsed(raw.to_string())
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

pub struct OpenAiReasoner {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiReasoner {
    /// The api key comes from `OPENAI_API_TOKEN`; a missing key is a
    /// warm-up concern, not a per-request one.
    pub fn new(base_url: &str, model: &str) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_TOKEN")
            .map_err(|_| anyhow!("OPENAI_API_TOKEN is not set"))?;
        let client = Client::builder().build()?;
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint, api_key, model: model.to_string() })
    }
}

impl Reasoner for OpenAiReasoner {
    fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?
            .error_for_status()?;
        let body: ChatResponse = response.json()?;
        let reply = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("reasoner returned no choices"))?;
        debug!(chars = reply.len(), "reasoner reply");
        Ok(reply)
    }
}
