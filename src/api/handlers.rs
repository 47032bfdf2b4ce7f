//! HTTP request handlers for the analysis service.

use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::{debug, info};

use super::ApiError;
use crate::analysis::Analyzer;
use crate::processing::{classify, UploadedFile};
use crate::services::{
    build_http_client, city_or_unknown, DocumentTranslator, GeminiClient, GeocodingProvider,
    GoogleTranslator, GoogleTts, HospitalLocator, IpInfoLocator, LocationProvider,
    OpenCageGeocoder, ServiceError, SpeechRecognizer, SpeechSynthesizer, WhisperClient,
};
use crate::types::{
    AnalysisReport, AppConfig, Hospital, Language, LanguageInfo, LocaleResponse, SpeechRequest,
    TranscriptionResponse, TranslateRequest, TranslateResponse,
};

/// Application state shared across handlers.
///
/// Holds the explicitly constructed service clients; no per-user state is
/// kept between requests.
pub struct AppState {
    pub config: AppConfig,
    /// `None` when no Gemini API key is configured
    pub analyzer: Option<Analyzer>,
    pub translator: DocumentTranslator,
    pub location: Arc<dyn LocationProvider>,
    pub hospitals: Arc<HospitalLocator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// `None` when no transcription endpoint is configured
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
}

impl AppState {
    /// Wire up every service client from configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, ServiceError> {
        let http = build_http_client(&config)?;

        let location: Arc<dyn LocationProvider> =
            Arc::new(IpInfoLocator::new(http.clone(), &config.ipinfo_url));
        let geocoder = config
            .opencage_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|key| {
                Arc::new(OpenCageGeocoder::new(http.clone(), &config.opencage_base_url, key))
                    as Arc<dyn GeocodingProvider>
            });
        let hospitals = Arc::new(HospitalLocator::new(location.clone(), geocoder));

        let speech: Arc<dyn SpeechSynthesizer> =
            Arc::new(GoogleTts::new(http.clone(), &config.tts_url, config.speech_limit));

        let analyzer = GeminiClient::from_config(http.clone(), &config).map(|gemini| {
            Analyzer::new(Arc::new(gemini), hospitals.clone())
                .with_speech(speech.clone(), Some(config.audio_dir.clone()))
                .with_section_limit(config.section_limit)
                .with_summary(config.summarize_sections)
        });

        let translator = DocumentTranslator::new(
            Arc::new(GoogleTranslator::new(http.clone(), &config.translate_url)),
            config.translation_limit,
        );

        let recognizer = config.whisper_base_url.as_deref().map(|url| {
            Arc::new(WhisperClient::new(
                http.clone(),
                url,
                config.whisper_api_key.as_deref(),
                &config.whisper_model,
            )) as Arc<dyn SpeechRecognizer>
        });

        Ok(Self {
            config,
            analyzer,
            translator,
            location,
            hospitals,
            speech,
            recognizer,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    analysis_enabled: bool,
    hospital_lookup_enabled: bool,
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        analysis_enabled: state.analyzer.is_some(),
        hospital_lookup_enabled: state.hospitals.is_enabled(),
    })
}

/// List supported translation languages.
pub async fn list_languages() -> Json<Vec<LanguageInfo>> {
    Json(Language::ALL.into_iter().map(LanguageInfo::from).collect())
}

/// Caller city and its default translation language.
pub async fn get_locale(State(state): State<Arc<AppState>>) -> Json<LocaleResponse> {
    let city = city_or_unknown(state.location.as_ref()).await;
    let default_language = Language::default_for_city(&city);
    Json(LocaleResponse {
        city,
        default_language,
    })
}

/// Read one multipart field as an uploaded file.
async fn read_upload(field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let file_name = field
        .file_name()
        .or(field.name())
        .unwrap_or_default()
        .to_string();
    let content_type = field.content_type().map(String::from);
    let data = field.bytes().await?.to_vec();

    Ok(UploadedFile {
        file_name,
        content_type,
        data,
    })
}

/// Analyze an uploaded medical image or health report.
///
/// Multipart fields: `image` (PNG/JPG/JPEG) or `report` (PDF/DOCX), not both.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut image = None;
    let mut report = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let upload = read_upload(field).await?;
        if upload.data.is_empty() {
            continue;
        }
        match name.as_str() {
            "image" => image = Some(upload),
            "report" => report = Some(upload),
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let submission = classify(image, report)?;
    let analyzer = state.analyzer.as_ref().ok_or(ApiError::Unavailable("Gemini"))?;

    let report = analyzer.analyze(submission).await?;
    info!(id = %report.id, kind = %report.kind, "Analysis returned");
    Ok(Json(report))
}

/// Translate analysis text into one of the supported languages.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let language = Language::parse(&request.language)
        .ok_or_else(|| ApiError::BadRequest(format!("Unsupported language: {}", request.language)))?;

    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Nothing to translate".to_string()));
    }

    let translated = state.translator.translate(&request.text, language).await?;

    Ok(Json(TranslateResponse {
        language,
        code: language.code().to_string(),
        chunks: translated.chunks,
        text: translated.text,
    }))
}

/// Speak text and return MP3 audio.
pub async fn synthesize_speech(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeechRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Nothing to speak".to_string()));
    }

    let audio = state.speech.synthesize(&request.text).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}

/// Transcribe uploaded audio (multipart field `audio`).
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let recognizer = state
        .recognizer
        .as_ref()
        .ok_or(ApiError::Unavailable("Transcription"))?;

    let mut audio = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("audio") {
            audio = Some(read_upload(field).await?);
        }
    }

    let audio = audio
        .filter(|a| !a.data.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing audio upload".to_string()))?;

    let text = recognizer.transcribe(audio.data, &audio.file_name).await?;
    Ok(Json(TranscriptionResponse { text }))
}

/// Nearest hospital to the caller, `null` when unavailable.
pub async fn nearest_hospital(State(state): State<Arc<AppState>>) -> Json<Option<Hospital>> {
    Json(state.hospitals.nearest().await)
}
