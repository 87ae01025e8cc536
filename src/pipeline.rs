//! Report processing pipeline
//!
//! Runs one submission through geocode → weather → prompt → generate →
//! translate → persist → dispatch. Geocoding is the only stage whose failure
//! stops the submission; every later stage degrades on its own.

use crate::advice::{Advice, AdviceGenerator, build_prompt};
use crate::alerts::{AlertDispatcher, DispatchReport, SmsCredentials, format_alert};
use crate::config::WhisperConfig;
use crate::i18n::Language;
use crate::location_resolver::{Geocoder, NominatimGeocoder};
use crate::models::{Location, Report, WeatherSnapshot};
use crate::session::{MapData, SessionState};
use crate::translate::Translator;
use crate::weather::{OpenWeatherClient, WeatherProvider};
use crate::{Result, WhisperError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Stages of a submission, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    Idle,
    Geocoding,
    Enriching,
    Prompting,
    Generating,
    Translating,
    Persisting,
    Dispatching,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything a completed submission produced
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub location: Location,
    pub weather: Option<WeatherSnapshot>,
    pub prompt: String,
    pub advice: Advice,
    pub translated_advice: String,
    pub alert_message: String,
    pub dispatch: DispatchReport,
    /// Stages visited, starting and ending at `Idle`
    pub stages: Vec<PipelineStage>,
}

/// Orchestrates the external collaborators for one submission at a time
pub struct ReportPipeline {
    geocoder: Box<dyn Geocoder>,
    weather: Box<dyn WeatherProvider>,
    generator: AdviceGenerator,
    translator: Translator,
    dispatcher: AlertDispatcher,
    recipients: Vec<String>,
    credentials: SmsCredentials,
    language: Language,
}

impl ReportPipeline {
    pub fn new(
        geocoder: impl Geocoder + 'static,
        weather: impl WeatherProvider + 'static,
        generator: AdviceGenerator,
        translator: Translator,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            geocoder: Box::new(geocoder),
            weather: Box::new(weather),
            generator,
            translator,
            dispatcher,
            recipients: Vec::new(),
            credentials: SmsCredentials::default(),
            language: Language::default(),
        }
    }

    #[must_use]
    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: SmsCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Wire the production adapters from configuration
    pub fn from_config(config: &WhisperConfig) -> Result<Self> {
        let build = |e: anyhow::Error| WhisperError::config(format!("{e:#}"));

        let pipeline = Self::new(
            NominatimGeocoder::new(&config.geocoding).map_err(build)?,
            OpenWeatherClient::new(&config.weather).map_err(build)?,
            AdviceGenerator::from_config(&config.llm).map_err(build)?,
            Translator::from_config(&config.translation).map_err(build)?,
            AlertDispatcher::from_config(&config.sms).map_err(build)?,
        )
        .with_recipients(config.sms.recipients.clone())
        .with_credentials(SmsCredentials::from(&config.sms))
        .with_language(config.ui.language);

        Ok(pipeline)
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Process a report and record the result in `session`
    pub async fn submit(&self, session: &mut SessionState, report: &Report) -> Result<Submission> {
        self.submit_at(session, report, Local::now()).await
    }

    /// Same as [`submit`](Self::submit) with an explicit generation time
    #[instrument(skip(self, session, generated_time), fields(place = %report.place, severity = %report.severity))]
    pub async fn submit_at(
        &self,
        session: &mut SessionState,
        report: &Report,
        generated_time: DateTime<Local>,
    ) -> Result<Submission> {
        let mut stages = vec![PipelineStage::Idle];
        report.validate()?;

        let place = report.place.trim();

        enter(&mut stages, PipelineStage::Geocoding);
        let Some(location) = self.geocoder.resolve(place).await else {
            warn!("Could not locate '{}', aborting submission", place);
            return Err(WhisperError::location_not_found(place));
        };
        info!("📍 {} ({})", location.address, location.format_coordinates());

        enter(&mut stages, PipelineStage::Enriching);
        let weather = self.weather.fetch(location.latitude, location.longitude).await;

        enter(&mut stages, PipelineStage::Prompting);
        let prompt = build_prompt(report, weather.as_ref());
        debug!("Prompt: {}", prompt);

        enter(&mut stages, PipelineStage::Generating);
        let advice = self.generator.generate(&prompt, self.language).await;

        enter(&mut stages, PipelineStage::Translating);
        let translated_advice = self.translator.translate(advice.text(), self.language).await;

        enter(&mut stages, PipelineStage::Persisting);
        session.record(
            translated_advice.clone(),
            MapData::new(location.latitude, location.longitude, place),
            generated_time,
        );

        enter(&mut stages, PipelineStage::Dispatching);
        let alert_message = format_alert(report, &translated_advice);
        let dispatch = self
            .dispatcher
            .dispatch(&self.recipients, &alert_message, &self.credentials)
            .await;

        enter(&mut stages, PipelineStage::Idle);
        info!(
            "Submission complete (advice source: {:?}, alert attempted: {})",
            advice.source(),
            dispatch.success()
        );

        Ok(Submission {
            location,
            weather,
            prompt,
            advice,
            translated_advice,
            alert_message,
            dispatch,
            stages,
        })
    }
}

fn enter(stages: &mut Vec<PipelineStage>, stage: PipelineStage) {
    debug!("Pipeline stage: {}", stage);
    stages.push(stage);
}
