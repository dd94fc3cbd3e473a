use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::pipeline::status::CandidateStatus;

/// Status-templated WhatsApp contact messages. Generation only: the deep
/// link opens the recruiter's own WhatsApp with the text prefilled.
#[derive(Clone)]
pub struct MessageService;

impl MessageService {
    pub fn new() -> Self {
        Self
    }

    pub fn template_for(&self, candidate: &Candidate, status: CandidateStatus) -> String {
        let name = first_name(&candidate.name);
        match status {
            CandidateStatus::Screening => format!(
                "Olá {}! Recebemos sua candidatura e seu perfil está em análise. Em breve entraremos em contato.",
                name
            ),
            CandidateStatus::VideoInterview => format!(
                "Olá {}! Você avançou para a etapa de entrevista por vídeo. Vamos te enviar o link para gravação.",
                name
            ),
            CandidateStatus::TheoreticalTest => format!(
                "Olá {}! A próxima etapa do processo é o teste teórico. O link com as instruções segue em breve.",
                name
            ),
            CandidateStatus::InPersonInterview => format!(
                "Olá {}! Gostaríamos de agendar uma entrevista presencial. Qual a sua disponibilidade?",
                name
            ),
            CandidateStatus::PracticalTest => format!(
                "Olá {}! Você avançou para o teste prático. Vamos combinar os detalhes.",
                name
            ),
            CandidateStatus::Hired => format!(
                "Parabéns {}! Você foi aprovado(a) no processo seletivo. Bem-vindo(a) ao time!",
                name
            ),
            CandidateStatus::Rejected => format!(
                "Olá {}, agradecemos sua participação no processo seletivo. Seu perfil ficará em nosso banco de talentos.",
                name
            ),
        }
    }

    /// Builds a `wa.me` deep link with the status-templated text.
    pub fn whatsapp_link(&self, candidate: &Candidate, status: CandidateStatus) -> Result<String> {
        let phone = candidate
            .phone
            .as_deref()
            .ok_or_else(|| Error::BadRequest("Candidate has no phone number".to_string()))?;
        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(Error::BadRequest("Candidate has no phone number".to_string()));
        }

        let mut link = url::Url::parse(&format!("https://wa.me/{}", digits))
            .map_err(|e| Error::Internal(format!("Invalid WhatsApp URL: {}", e)))?;
        link.query_pairs_mut()
            .append_pair("text", &self.template_for(candidate, status));
        Ok(link.to_string())
    }
}

fn first_name(full: &str) -> &str {
    full.split_whitespace().next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(phone: Option<&str>) -> Candidate {
        Candidate {
            id: 1,
            name: "Ana Souza".to_string(),
            email: None,
            phone: phone.map(|p| p.to_string()),
            score: None,
            status: None,
            job_ids: vec![],
            video_interview: None,
            last_contact: None,
            ai_summary: None,
            profile: Default::default(),
            behavioral_test_status: None,
            theoretical_test_status: None,
            sex: None,
            education_level: None,
            age: None,
            city: None,
            neighborhood: None,
            rejection_reason: None,
            interview_notes: None,
            created_at: None,
        }
    }

    #[test]
    fn link_strips_phone_formatting_and_encodes_text() {
        let service = MessageService::new();
        let link = service
            .whatsapp_link(&candidate(Some("+55 (81) 99999-0000")), CandidateStatus::Hired)
            .unwrap();
        assert!(link.starts_with("https://wa.me/5581999990000?text="));
        assert!(!link.contains(' '));
    }

    #[test]
    fn missing_phone_is_a_client_error() {
        let service = MessageService::new();
        assert!(service
            .whatsapp_link(&candidate(None), CandidateStatus::Screening)
            .is_err());
    }

    #[test]
    fn template_addresses_the_candidate_by_first_name() {
        let service = MessageService::new();
        let text = service.template_for(&candidate(None), CandidateStatus::InPersonInterview);
        assert!(text.contains("Ana"));
        assert!(!text.contains("Souza"));
    }
}
