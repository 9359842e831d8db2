//! Read-only card view of a fetched registry record.

use crate::core::formatter::normalize;
use crate::domain::model::{Activity, CnpjRecord};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Local};

pub const TRADE_NAME_PLACEHOLDER: &str = "**************";
pub const NOT_INFORMED: &str = "Não informado";

pub const GENERAL_SECTION: &str = "Dados Gerais";
pub const ACTIVITY_SECTION: &str = "Atividade Econômica";
pub const PARTNERS_SECTION: &str = "Quadro Societário";
pub const LOCATION_SECTION: &str = "Localização";
pub const CONTACT_SECTION: &str = "Contato";

const CARD_TITLE: &str = "Resultado da Consulta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Field { label: &'static str, value: String },
    Badge(Badge),
    Heading(&'static str),
    Item { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub active: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub cnpj: String,
    pub is_active: bool,
    pub sections: Vec<Section>,
}

impl RecordView {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter())
            .find_map(|line| match line {
                Line::Badge(badge) => Some(badge),
                _ => None,
            })
    }
}

impl Section {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Field { label: l, value } if *l == label => Some(value.as_str()),
            _ => None,
        })
    }
}

fn field(label: &'static str, value: impl Into<String>) -> Line {
    Line::Field {
        label,
        value: value.into(),
    }
}

fn or_placeholder(value: Option<&String>, placeholder: &str) -> String {
    value.cloned().unwrap_or_else(|| placeholder.to_string())
}

fn activity_items(activities: &[Activity]) -> impl Iterator<Item = Line> + '_ {
    activities.iter().map(|a| Line::Item {
        key: a.code.clone(),
        value: a.text.clone(),
    })
}

pub fn present(record: &CnpjRecord) -> RecordView {
    let is_active = record.is_active();
    let mut sections = Vec::with_capacity(5);

    let mut general = vec![
        field("Razão Social", &record.nome),
        field(
            "Nome Fantasia",
            or_placeholder(record.fantasia.as_ref(), TRADE_NAME_PLACEHOLDER),
        ),
        field("CNPJ", &record.cnpj),
        field("Tipo", &record.tipo),
        field("Natureza Jurídica", &record.natureza_juridica),
        Line::Badge(Badge {
            active: is_active,
            text: if is_active {
                format!("✓ {}", record.situacao)
            } else {
                record.situacao.clone()
            },
        }),
        field("Data da Situação", &record.data_situacao),
    ];
    if let Some(reason) = &record.motivo_situacao {
        general.push(field("Motivo da Situação", reason));
    }
    general.push(field("Abertura", &record.abertura));
    general.push(field("Capital Social", format!("R$ {}", record.capital_social)));
    if let Some(size) = &record.porte {
        general.push(field("Porte", size));
    }
    if let Some(efr) = &record.efr {
        general.push(field("Ente Federativo Responsável", efr));
    }
    sections.push(Section {
        title: GENERAL_SECTION,
        lines: general,
    });

    let mut activity = vec![Line::Heading("Principal")];
    activity.extend(activity_items(&record.atividade_principal));
    if !record.atividades_secundarias.is_empty() {
        activity.push(Line::Heading("Secundárias"));
        activity.extend(activity_items(&record.atividades_secundarias));
    }
    sections.push(Section {
        title: ACTIVITY_SECTION,
        lines: activity,
    });

    if !record.qsa.is_empty() {
        let mut partners = Vec::new();
        for partner in &record.qsa {
            partners.push(Line::Item {
                key: partner.nome.clone(),
                value: partner.qual.clone(),
            });
            if let Some(rep) = &partner.nome_rep_legal {
                let role = partner.qual_rep_legal.as_deref().unwrap_or("Representante Legal");
                partners.push(Line::Item {
                    key: format!("  ↳ {}", rep),
                    value: role.to_string(),
                });
            }
        }
        sections.push(Section {
            title: PARTNERS_SECTION,
            lines: partners,
        });
    }

    let mut location = vec![field(
        "Logradouro",
        format!("{}, {}", record.logradouro, record.numero),
    )];
    if let Some(complement) = &record.complemento {
        location.push(field("Complemento", complement));
    }
    location.push(field("Bairro", &record.bairro));
    location.push(field("CEP", &record.cep));
    location.push(field(
        "Município / UF",
        format!("{} - {}", record.municipio, record.uf),
    ));
    sections.push(Section {
        title: LOCATION_SECTION,
        lines: location,
    });

    sections.push(Section {
        title: CONTACT_SECTION,
        lines: vec![
            field("E-mail", or_placeholder(record.email.as_ref(), NOT_INFORMED)),
            field(
                "Telefone",
                or_placeholder(record.telefone.as_ref(), NOT_INFORMED),
            ),
        ],
    });

    RecordView {
        cnpj: record.cnpj.clone(),
        is_active,
        sections,
    }
}

/// Plain-text card, one section after another.
pub fn render(view: &RecordView) -> String {
    let mut out = String::new();
    out.push_str(CARD_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(CARD_TITLE.chars().count()));
    out.push('\n');

    for section in &view.sections {
        out.push('\n');
        out.push_str(section.title);
        out.push('\n');
        out.push_str(&"-".repeat(section.title.chars().count()));
        out.push('\n');
        for line in &section.lines {
            out.push_str(&render_line(line));
            out.push('\n');
        }
    }

    out
}

pub fn render_line(line: &Line) -> String {
    match line {
        Line::Field { label, value } => format!("{}: {}", label, value),
        Line::Badge(badge) => format!("Situação Cadastral: [{}]", badge.text),
        Line::Heading(heading) => format!("[{}]", heading),
        Line::Item { key, value } => format!("  {}  {}", key, value),
    }
}

pub fn card_file_name(view: &RecordView) -> String {
    format!("cartao-cnpj-{}.txt", normalize(&view.cnpj))
}

/// Print action: hands the rendered card to the output facility.
pub async fn print_card<S: Storage>(view: &RecordView, storage: &S) -> Result<String> {
    print_card_at(view, storage, Local::now()).await
}

pub async fn print_card_at<S: Storage>(
    view: &RecordView,
    storage: &S,
    consulted_at: DateTime<Local>,
) -> Result<String> {
    let mut document = render(view);
    document.push_str(&format!(
        "\nConsulta realizada em {}\n",
        consulted_at.format("%d/%m/%Y %H:%M:%S")
    ));

    let file_name = card_file_name(view);
    storage.write_file(&file_name, document.as_bytes()).await?;
    tracing::info!("🖨 Card printed to {}", file_name);
    Ok(file_name)
}
