//! # Prompt Assembly
//!
//! Prompt templates in both supported languages, assembled from the search
//! parameters. Sections are only included when the corresponding input is
//! present, so the common case stays short.
//!
//! The suggestion prompt instructs the model to answer with a fenced JSON
//! object; [`crate::parse`] strips the fence and deserializes it.

use formulary_core::{Language, Product, TreatmentType};

/// Everything a suggestion request carries.
#[derive(Debug, Clone, Default)]
pub struct SuggestionRequest {
    /// Condition or disease to compound for.
    pub disease: String,
    /// Catalog products the pharmacy prefers to use.
    pub products: Vec<Product>,
    /// Ingredients the patient is already taking (incompatibility check).
    pub current_ingredients: Vec<String>,
    pub is_lactose_intolerant: bool,
    pub is_allergic_to_dye: bool,
    pub treatment_type: TreatmentType,
    pub language: Language,
}

/// Builds the full suggestion prompt for a request.
pub fn suggestion_prompt(request: &SuggestionRequest) -> String {
    match request.language {
        Language::PtBr => suggestion_prompt_pt(request),
        Language::En => suggestion_prompt_en(request),
    }
}

fn product_list(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| {
            if p.description.is_empty() {
                format!("- {}", p.name)
            } else {
                format!("- {}: {}", p.name, p.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn suggestion_prompt_pt(request: &SuggestionRequest) -> String {
    let mut prompt = format!(
        "Você é um farmacêutico magistral experiente. Sugira fórmulas \
         magistrais para o tratamento de: {}.\n",
        request.disease
    );

    match request.treatment_type {
        TreatmentType::Topical => {
            prompt.push_str("Sugira APENAS fórmulas de uso tópico.\n");
        }
        TreatmentType::Internal => {
            prompt.push_str("Sugira APENAS fórmulas de uso interno.\n");
        }
        TreatmentType::All => {}
    }

    if request.is_lactose_intolerant {
        prompt.push_str(
            "IMPORTANTE: o paciente é intolerante à lactose. Não use lactose \
             como excipiente; indique alternativas.\n",
        );
    }

    if request.is_allergic_to_dye {
        prompt.push_str(
            "IMPORTANTE: o paciente é alérgico a corantes. Evite corantes em \
             todas as fórmulas.\n",
        );
    }

    if !request.current_ingredients.is_empty() {
        prompt.push_str(&format!(
            "O paciente já utiliza: {}. Verifique incompatibilidades e \
             mencione-as no resumo.\n",
            request.current_ingredients.join(", ")
        ));
    }

    if !request.products.is_empty() {
        prompt.push_str(&format!(
            "Dê preferência aos ativos disponíveis nesta farmácia:\n{}\n",
            product_list(&request.products)
        ));
    }

    prompt.push_str(
        "\nResponda SOMENTE com um objeto JSON dentro de um bloco ```json, \
         neste formato:\n\
         {\"summary\": \"resumo clínico\", \"formulas\": [{\"name\": \"...\", \
         \"description\": \"...\", \"ingredients\": [\"ativo + dosagem\"], \
         \"instructions\": \"posologia\", \"averageValue\": \"R$ ...\"}]}",
    );

    prompt
}

fn suggestion_prompt_en(request: &SuggestionRequest) -> String {
    let mut prompt = format!(
        "You are an experienced compounding pharmacist. Suggest compounding \
         formulas for the treatment of: {}.\n",
        request.disease
    );

    match request.treatment_type {
        TreatmentType::Topical => {
            prompt.push_str("Suggest ONLY topical formulas.\n");
        }
        TreatmentType::Internal => {
            prompt.push_str("Suggest ONLY internal-use formulas.\n");
        }
        TreatmentType::All => {}
    }

    if request.is_lactose_intolerant {
        prompt.push_str(
            "IMPORTANT: the patient is lactose intolerant. Do not use lactose \
             as an excipient; indicate alternatives.\n",
        );
    }

    if request.is_allergic_to_dye {
        prompt.push_str(
            "IMPORTANT: the patient is allergic to dyes. Avoid dyes in every \
             formula.\n",
        );
    }

    if !request.current_ingredients.is_empty() {
        prompt.push_str(&format!(
            "The patient already takes: {}. Check for incompatibilities and \
             mention them in the summary.\n",
            request.current_ingredients.join(", ")
        ));
    }

    if !request.products.is_empty() {
        prompt.push_str(&format!(
            "Prefer the active ingredients available at this pharmacy:\n{}\n",
            product_list(&request.products)
        ));
    }

    prompt.push_str(
        "\nAnswer ONLY with a JSON object inside a ```json block, in this \
         format:\n\
         {\"summary\": \"clinical summary\", \"formulas\": [{\"name\": \"...\", \
         \"description\": \"...\", \"ingredients\": [\"active + dose\"], \
         \"instructions\": \"dosage instructions\", \"averageValue\": \"$ ...\"}]}",
    );

    prompt
}

/// Prompt for generating a formula icon.
pub fn icon_prompt(formula_name: &str, language: Language) -> String {
    match language {
        Language::PtBr => format!(
            "Gere um ícone minimalista, estilo flat, fundo transparente, \
             representando a fórmula magistral \"{formula_name}\". Sem texto."
        ),
        Language::En => format!(
            "Generate a minimalist flat-style icon with a transparent \
             background representing the compounding formula \
             \"{formula_name}\". No text."
        ),
    }
}

/// Prompt for reading a prescription photograph.
pub fn prescription_prompt(language: Language) -> String {
    let format_hint = "{\"doctorName\": \"...\", \"patientName\": \"...\", \
                       \"date\": \"...\", \"prescribedItems\": [{\"name\": \
                       \"...\", \"instructions\": \"...\"}]}";
    match language {
        Language::PtBr => format!(
            "Leia esta receita médica e extraia os dados. Responda SOMENTE \
             com um objeto JSON dentro de um bloco ```json, neste formato:\n\
             {format_hint}\n\
             Use string vazia quando um campo não estiver legível."
        ),
        Language::En => format!(
            "Read this medical prescription and extract its data. Answer \
             ONLY with a JSON object inside a ```json block, in this \
             format:\n{format_hint}\n\
             Use an empty string when a field is not legible."
        ),
    }
}
