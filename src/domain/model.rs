use serde::{Deserialize, Deserializer, Serialize};

/// Registry literal for a company that is currently operating.
pub const ACTIVE_STATUS: &str = "ATIVA";

/// Snapshot of one company's public registration as returned by the registry.
///
/// Field names follow the registry's JSON. Optional text fields treat an
/// empty string the same as a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnpjRecord {
    pub cnpj: String,
    #[serde(default)]
    pub tipo: String,
    pub nome: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub fantasia: Option<String>,
    #[serde(default)]
    pub natureza_juridica: String,

    pub situacao: String,
    #[serde(default)]
    pub data_situacao: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub motivo_situacao: Option<String>,

    #[serde(default)]
    pub atividade_principal: Vec<Activity>,
    #[serde(default)]
    pub atividades_secundarias: Vec<Activity>,

    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub complemento: Option<String>,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub municipio: String,
    #[serde(default)]
    pub uf: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub telefone: Option<String>,

    #[serde(default)]
    pub qsa: Vec<Partner>,

    #[serde(default)]
    pub capital_social: String,
    #[serde(default)]
    pub abertura: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub efr: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub porte: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub ultima_atualizacao: Option<String>,
}

impl CnpjRecord {
    pub fn is_active(&self) -> bool {
        self.situacao == ACTIVE_STATUS
    }

    pub fn principal_activity(&self) -> Option<&Activity> {
        self.atividade_principal.first()
    }
}

/// Economic activity (CNAE) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub text: String,
}

/// One row of the ownership roster (QSA).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub nome: String,
    #[serde(default)]
    pub qual: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub nome_rep_legal: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub qual_rep_legal: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_optional_fields_become_none() {
        let record: CnpjRecord = serde_json::from_value(serde_json::json!({
            "status": "OK",
            "cnpj": "11.222.333/0001-81",
            "nome": "EMPRESA EXEMPLO LTDA",
            "fantasia": "",
            "situacao": "ATIVA",
            "email": "",
            "telefone": "(11) 4000-0000",
            "complemento": null
        }))
        .unwrap();

        assert_eq!(record.fantasia, None);
        assert_eq!(record.email, None);
        assert_eq!(record.complemento, None);
        assert_eq!(record.telefone.as_deref(), Some("(11) 4000-0000"));
        assert!(record.qsa.is_empty());
        assert!(record.is_active());
    }

    #[test]
    fn test_activity_order_is_preserved() {
        let record: CnpjRecord = serde_json::from_value(serde_json::json!({
            "cnpj": "11.222.333/0001-81",
            "nome": "EMPRESA EXEMPLO LTDA",
            "situacao": "BAIXADA",
            "atividade_principal": [{"code": "62.01-5-01", "text": "Desenvolvimento de programas"}],
            "atividades_secundarias": [
                {"code": "62.02-3-00", "text": "Customizável"},
                {"code": "62.04-0-00", "text": "Consultoria"},
                {"code": "63.11-9-00", "text": "Hospedagem"}
            ]
        }))
        .unwrap();

        let codes: Vec<&str> = record
            .atividades_secundarias
            .iter()
            .map(|a| a.code.as_str())
            .collect();
        assert_eq!(codes, vec!["62.02-3-00", "62.04-0-00", "63.11-9-00"]);
        assert_eq!(record.principal_activity().unwrap().code, "62.01-5-01");
        assert!(!record.is_active());
    }
}
