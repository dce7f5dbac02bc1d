//! Prompt construction for IDSS analyses.
//!
//! Every prompt is a fixed preamble (persona, operator size, reference year,
//! language and length guidance) followed by a body specific to the analysis
//! type. Bodies list the data fields first and close with the questions the
//! model should answer.

use std::fmt;

use serde_json::Value;

use super::formatter::{
    format_score, format_value, format_weight_percent, IdssWeightLevel, PerformanceStatus,
    DEFAULT_PRECISION, HISTORICAL_SCORE_PRECISION, NOT_AVAILABLE,
};
use super::request::{
    Analysis, AnalysisRequest, DimensionData, IdssData, IndicatorData, IndicatorSummary,
};
use super::PromptError;

/// Persona the model is asked to adopt.
pub const PERSONA: &str = "Você é um especialista em gestão de saúde com 20 anos de experiência em operadoras de planos de saúde, focado em analisar e melhorar os indicadores do IDSS (Índice de Desempenho da Saúde Suplementar) da ANS. Seja sucinto, objetivo e use linguagem simples e direta. Forneça análises críticas baseadas nas fichas técnicas dos indicadores e nas boas práticas de gestão de processos.";

const NOT_INFORMED_SECTOR: &str = "Não informado";
const NOT_INFORMED_DIRECTION: &str = "Não informada";
const PREVIOUS_YEAR_UNAVAILABLE: &str = "N/A para o ano anterior";
const NO_DIMENSION_INDICATORS: &str = "Nenhum indicador com dados para o ano de referência.";
const NO_DIMENSIONS: &str = "Nenhuma dimensão com dados.";

/// A fully assembled prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `max_chars` characters, for logging.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.0.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Values shared by every prompt body.
#[derive(Debug, Clone, Copy)]
struct PromptContext<'a> {
    operator_size: &'a str,
    year: i32,
}

/// Builds the prompt for a request, defaulting the reference year to the
/// current calendar year.
pub fn build_prompt(request: &AnalysisRequest) -> Result<Prompt, PromptError> {
    build_prompt_with_default_year(request, current_year())
}

/// Builds the prompt for a request, using `default_year` when the request
/// carries no reference year.
///
/// # Errors
///
/// `InvalidAnalysisType` for an absent or unknown type, `MissingData` when
/// the type's payload is absent or empty.
pub fn build_prompt_with_default_year(
    request: &AnalysisRequest,
    default_year: i32,
) -> Result<Prompt, PromptError> {
    let analysis = request.resolve()?;
    let ctx = PromptContext {
        operator_size: request.operator_size(),
        year: request.reference_year_or(default_year),
    };

    let body = match analysis {
        Analysis::IndicatorLastPeriod(data) => indicator_last_period(data, ctx),
        Analysis::IndicatorYearlyConsolidated(data) => indicator_yearly_consolidated(data, ctx),
        Analysis::IndicatorYearlyComparison(data) => indicator_yearly_comparison(data, ctx),
        Analysis::Dimension(data) => dimension(data, ctx),
        Analysis::Idss(data) => idss(data, ctx),
        Analysis::OverallIndicators(list) => overall_indicators(list, ctx),
    };

    Ok(Prompt(format!("{}\n\n{}", preamble(ctx), body)))
}

fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year()
}

fn preamble(ctx: PromptContext<'_>) -> String {
    format!(
        "{PERSONA}\n\nPara a análise, considere o porte da operadora: {} e o ANO DE REFERÊNCIA DOS DADOS: {}. \
         Seu objetivo é fornecer uma análise concisa (idealmente 2-3 parágrafos curtos), útil e acionável, em português brasileiro.",
        ctx.operator_size, ctx.year
    )
}

fn text_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|s| !s.trim().is_empty()).unwrap_or(default)
}

/// Description, sector, target and direction lines shared by the indicator analyses.
fn indicator_descriptors(data: &IndicatorData) -> String {
    let direction = data
        .target_direction
        .as_ref()
        .map(|d| d.to_string())
        .unwrap_or_else(|| NOT_INFORMED_DIRECTION.to_string());

    format!(
        "- Descrição do Indicador: {}\n\
         - Setor Responsável: {}\n\
         - Meta (Ficha Técnica): {}\n\
         - Direção da Meta (up=melhor para cima, down=melhor para baixo): {}",
        text_or(data.description.as_deref(), NOT_AVAILABLE),
        text_or(data.responsible_sector.as_deref(), NOT_INFORMED_SECTOR),
        text_or(data.target_description.as_deref(), NOT_AVAILABLE),
        direction,
    )
}

fn indicator_name(data: &IndicatorData) -> &str {
    text_or(data.display_name(), NOT_AVAILABLE)
}

fn indicator_last_period(data: &IndicatorData, ctx: PromptContext<'_>) -> String {
    let year = ctx.year;
    format!(
        "Análise do último período para o indicador '{name}' (Ano de Referência: {year}):\n\
         {descriptors}\n\
         - Resultado do período '{period}' do ano {year}: {result}.\n\
         \n\
         Avalie este resultado em relação à meta e boas práticas para o ano {year}. \
         Destaque pontos positivos, negativos e possíveis causas para o resultado. \
         Sugira ações de melhoria específicas e realistas.",
        name = indicator_name(data),
        descriptors = indicator_descriptors(data),
        period = text_or(data.current_period_label.as_deref(), NOT_AVAILABLE),
        result = format_value(data.current_value.as_ref(), data.is_rate(), DEFAULT_PRECISION),
    )
}

fn indicator_yearly_consolidated(data: &IndicatorData, ctx: PromptContext<'_>) -> String {
    let year = ctx.year;
    format!(
        "Análise do resultado anual consolidado para o indicador '{name}' (Ano de Referência: {year}):\n\
         {descriptors}\n\
         - Resultado Anual Consolidado ({year}): {result}.\n\
         - Nota Final Obtida ({year}): {score}.\n\
         \n\
         Avalie este resultado consolidado e a nota final em relação à meta e boas práticas para o ano {year}. \
         Destaque pontos positivos, negativos e possíveis causas. \
         Sugira ações de melhoria específicas para otimizar a nota final.",
        name = indicator_name(data),
        descriptors = indicator_descriptors(data),
        result = format_value(data.yearly_value(), data.is_rate(), DEFAULT_PRECISION),
        score = format_score(data.nota_final.as_ref()),
    )
}

fn indicator_yearly_comparison(data: &IndicatorData, ctx: PromptContext<'_>) -> String {
    let year = ctx.year;
    let (previous_year, previous) = match year.checked_sub(1) {
        Some(previous_year) => {
            let previous = match data.previous_year_value.as_ref().filter(|v| !v.is_null()) {
                Some(value) => format_value(Some(value), data.is_rate(), DEFAULT_PRECISION),
                None => PREVIOUS_YEAR_UNAVAILABLE.to_string(),
            };
            (previous_year.to_string(), previous)
        }
        // i32::MIN has no previous year.
        None => (NOT_AVAILABLE.to_string(), PREVIOUS_YEAR_UNAVAILABLE.to_string()),
    };

    format!(
        "Análise comparativa anual para o indicador '{name}' (Ano de Referência: {year}):\n\
         {descriptors}\n\
         - Resultado Anual Consolidado Atual ({year}): {current}.\n\
         - Resultado Anual Consolidado Anterior ({previous_year}): {previous}.\n\
         \n\
         Compare os resultados entre os anos {year} e {previous_year}. \
         Houve melhora, piora ou manutenção do desempenho? \
         Quais os possíveis fatores para essa variação e qual o impacto no desempenho geral?",
        name = indicator_name(data),
        descriptors = indicator_descriptors(data),
        current = format_value(data.yearly_value(), data.is_rate(), DEFAULT_PRECISION),
    )
}

fn dimension(data: &DimensionData, ctx: PromptContext<'_>) -> String {
    let year = ctx.year;
    let summaries: Vec<String> = data
        .indicators
        .iter()
        .map(|indicator| {
            let result = indicator.result_for_year(year);
            format!(
                "- {} (ID {}): Resultado {}, Nota Final {}",
                text_or(indicator.display_name(), NOT_AVAILABLE),
                text_or(indicator.id.as_deref(), NOT_AVAILABLE),
                format_value(
                    result.and_then(|r| r.consolidated_value.as_ref()),
                    indicator.is_rate.unwrap_or(false),
                    DEFAULT_PRECISION,
                ),
                format_score(result.and_then(|r| r.nota_final.as_ref())),
            )
        })
        .collect();
    let summaries = if summaries.is_empty() {
        NO_DIMENSION_INDICATORS.to_string()
    } else {
        summaries.join("\n")
    };

    format!(
        "Análise da dimensão '{name}' (ID: {id}, Ano de Referência: {year}):\n\
         - Nota Final Calculada da Dimensão: {score}.\n\
         - Peso da Dimensão no IDSS: {weight}.\n\
         - Indicadores e suas notas finais (ano {year}):\n\
         {summaries}\n\
         \n\
         Avalie o desempenho geral desta dimensão com base na sua nota, peso e nos indicadores. \
         Identifique os indicadores que mais impactam (positiva e negativamente) a nota. \
         Quais são os pontos fortes e fracos? \
         Sugira focos de atuação e estratégias para melhorar a nota desta dimensão.",
        name = text_or(data.name.as_deref(), NOT_AVAILABLE),
        id = text_or(data.id.as_deref(), NOT_AVAILABLE),
        score = format_score(data.nota_final_calculada.as_ref()),
        weight = format_weight_percent(data.weight_in_idss.as_ref()),
    )
}

fn idss(data: &IdssData, ctx: PromptContext<'_>) -> String {
    let year = ctx.year;
    let dimensions: Vec<String> = data
        .dimensions
        .iter()
        .map(|dimension| {
            format!(
                "- {} (ID: {}): Nota Final {}, Peso {}",
                text_or(dimension.name.as_deref(), NOT_AVAILABLE),
                text_or(dimension.id.as_deref(), NOT_AVAILABLE),
                format_score(dimension.nota_final_calculada.as_ref()),
                format_weight_percent(dimension.weight_in_idss.as_ref()),
            )
        })
        .collect();
    let dimensions = if dimensions.is_empty() {
        NO_DIMENSIONS.to_string()
    } else {
        dimensions.join("\n")
    };

    let history: Vec<String> = data
        .historical_scores_newest_first()
        .into_iter()
        .map(|record| {
            format!(
                "- Programa IDSS {} (base {}): Nota {}",
                year_or_na(record.program_year),
                year_or_na(record.base_year),
                format_value(record.score.as_ref(), false, HISTORICAL_SCORE_PRECISION),
            )
        })
        .collect();
    let history = if history.is_empty() {
        String::new()
    } else {
        format!(
            "\nPara referência, as notas finais históricas do IDSS (fonte oficial) foram:\n{}\n",
            history.join("\n")
        )
    };

    format!(
        "Análise estratégica do IDSS da operadora (Ano de Referência: {year}):\n\
         - Nota Final IDSS Global Calculada ({year}): {score}.\n\
         - Notas Finais e Pesos das Dimensões:\n\
         {dimensions}\n\
         {history}\n\
         Com base na nota final geral e no desempenho das dimensões para {year}, forneça uma visão estratégica. \
         Quais dimensões impulsionam o resultado? Quais necessitam de atenção? \
         Quais as implicações deste resultado para a operadora? \
         Que recomendações de alto nível, priorizadas e acionáveis, podem ser feitas?",
        score = format_score(data.nota_final_calculada.as_ref()),
    )
}

fn year_or_na(year: Option<i32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn overall_indicators(list: &[IndicatorSummary], ctx: PromptContext<'_>) -> String {
    let year = ctx.year;
    let details: Vec<String> = list
        .iter()
        .map(|indicator| {
            let result = indicator.result_for_year(year);
            let score: Option<&Value> = result.and_then(|r| r.nota_final.as_ref());
            format!(
                "Indicador: {} (ID: {}, Dim: {}, Peso na Dim: {}, Relevância IDSS: {}, \
                 Resultado ({year}): {}, Nota Final: {} - Performance: {})",
                text_or(indicator.display_name(), NOT_AVAILABLE),
                text_or(indicator.id.as_deref(), NOT_AVAILABLE),
                text_or(indicator.dimension_id.as_deref(), NOT_AVAILABLE),
                format_value(
                    indicator.weight_in_dimension.as_ref(),
                    false,
                    DEFAULT_PRECISION
                ),
                IdssWeightLevel::from_code(indicator.weight_level_code()).text(),
                format_value(
                    result.and_then(|r| r.consolidated_value.as_ref()),
                    indicator.is_rate.unwrap_or(false),
                    DEFAULT_PRECISION
                ),
                format_score(score),
                PerformanceStatus::from_value(score).label(),
            )
        })
        .collect();

    format!(
        "Análise geral de todos os indicadores da operadora (Ano de Referência: {year}):\n\
         Abaixo a lista de indicadores com performance:\n\
         {details}\n\
         \n\
         Com base nesta visão geral, identifique os padrões mais significativos:\n\
         1. Destaque 3-5 indicadores com PIOR desempenho (baixa nota final) que tenham ALTA ou MÉDIA relevância e exigem atenção prioritária.\n\
         2. Destaque 2-3 indicadores com MELHOR desempenho (alta nota final) que sejam de ALTA ou MÉDIA relevância.\n\
         3. Existem dimensões específicas onde os indicadores problemáticos estão concentrados?\n\
         4. Quais são as 2-3 recomendações ESTRATÉGICAS e PRIORIZADAS para a gestão focar nos próximos 3-6 meses para melhorar o IDSS?\n\
         Seja específico e justifique com base nos dados.",
        details = details.join("\n"),
    )
}
