//! Field layout of each wizard step.

use eframe::egui::{self, Ui};

use super::components::{date_row, file_row, password_row, resposta_row, text_row};
use crate::models::paciente::Responsavel;
use crate::wizard::credentials::CredentialsForm;
use crate::wizard::{ColaboradorForms, GerenteForms, PacienteForms, UnidadeForm};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

fn grid(ui: &mut Ui, id: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, add_contents);
}

fn credentials_rows(ui: &mut Ui, form: &mut CredentialsForm) {
    text_row(ui, "Nome:", &mut form.nome);
    text_row(ui, "RG:", &mut form.rg);
    text_row(ui, "CPF:", &mut form.cpf);
    text_row(ui, "Unidade (id):", &mut form.unidade_id);
    text_row(ui, "Email:", &mut form.email);
    text_row(ui, "Confirmar email:", &mut form.email_confirm);
    password_row(ui, "Senha:", &mut form.password);
    password_row(ui, "Confirmar senha:", &mut form.password_confirm);
}

/// Identity of an existing record, shown but not editable.
fn identity_rows(ui: &mut Ui, form: &CredentialsForm) {
    for (label, value) in [
        ("Nome:", &form.nome),
        ("RG:", &form.rg),
        ("CPF:", &form.cpf),
        ("Unidade (id):", &form.unidade_id),
    ] {
        ui.label(label);
        ui.label(value.as_str());
        ui.end_row();
    }
    ui.label("");
    ui.small("Dados de identificação não são alterados nesta tela.");
    ui.end_row();
}

fn responsavel_rows(ui: &mut Ui, form: &mut Responsavel) {
    text_row(ui, "Nome:", &mut form.nome);
    text_row(ui, "CPF:", &mut form.cpf);
    text_row(ui, "Telefone:", &mut form.telefone);
    text_row(ui, "Email:", &mut form.email);
    text_row(ui, "Profissão:", &mut form.profissao);
}

/// Returns a message when a picked file could not be read.
pub fn paciente(ui: &mut Ui, forms: &mut PacienteForms, step: usize) -> Option<String> {
    let mut file_error = None;

    grid(ui, "paciente_step", |ui| match step {
        1 => {
            if forms.edit_mode {
                identity_rows(ui, &forms.credentials);
            } else {
                credentials_rows(ui, &mut forms.credentials);
            }
            date_row(ui, "paciente_nascimento", "Nascimento:", &mut forms.geral.nascimento);
            text_row(ui, "Sexo:", &mut forms.geral.sexo);
            text_row(ui, "Telefone:", &mut forms.geral.telefone);
            text_row(ui, "Endereço:", &mut forms.geral.endereco);
            text_row(ui, "Cidade:", &mut forms.geral.cidade);
            text_row(ui, "CEP:", &mut forms.geral.cep);
        }
        2 => {
            let escola = &mut forms.escola;
            text_row(ui, "Escola:", &mut escola.nome_escola);
            text_row(ui, "Série:", &mut escola.serie);
            text_row(ui, "Turno:", &mut escola.turno);
            text_row(ui, "Professor(a):", &mut escola.professor);
            resposta_row(ui, "escola_mediador", "Possui mediador?", &mut escola.possui_mediador);
            text_row(ui, "Observações:", &mut escola.observacoes);
        }
        3 => responsavel_rows(ui, &mut forms.mae),
        4 => responsavel_rows(ui, &mut forms.pai),
        5 => {
            let maisinfo = &mut forms.maisinfo;
            text_row(ui, "Mora com:", &mut maisinfo.mora_com);
            resposta_row(ui, "maisinfo_irmaos", "Possui irmãos?", &mut maisinfo.possui_irmaos);
            if maisinfo.irmaos_enabled() {
                ui.label("Quantos irmãos:");
                let mut quantidade = maisinfo.quantidade_irmaos.unwrap_or(0);
                if ui.add(egui::DragValue::new(&mut quantidade).range(0..=20)).changed() {
                    maisinfo.quantidade_irmaos = Some(quantidade);
                }
                ui.end_row();
            }
            text_row(ui, "Como nos conheceu:", &mut maisinfo.como_conheceu);
        }
        6 => {
            let saude = &mut forms.saude;
            text_row(ui, "Diagnóstico:", &mut saude.diagnostico);
            text_row(ui, "CID:", &mut saude.cid);
            text_row(ui, "Medicamentos:", &mut saude.medicamentos);
            text_row(ui, "Alergias:", &mut saude.alergias);
            resposta_row(ui, "saude_terapia", "Faz terapia?", &mut saude.possui_terapia);
            if saude.terapia_enabled() {
                text_row(ui, "Endereço da terapia:", &mut saude.endereco_terapia);
            }
            resposta_row(ui, "saude_convenio", "Possui convênio?", &mut saude.possui_convenio);
            if saude.convenio_enabled() {
                text_row(ui, "Convênio:", &mut saude.convenio);
            }
        }
        _ => {
            let docs = &mut forms.documentos;
            let picks = [
                file_row(ui, "Foto:", &mut docs.foto, IMAGE_EXTENSIONS),
                file_row(ui, "Relatório escolar:", &mut docs.relescolar, DOCUMENT_EXTENSIONS),
                file_row(ui, "Laudo:", &mut docs.laudo, DOCUMENT_EXTENSIONS),
                file_row(ui, "Comprovante de residência:", &mut docs.compres, DOCUMENT_EXTENSIONS),
                file_row(ui, "RG (documento):", &mut docs.rgdoc, DOCUMENT_EXTENSIONS),
            ];
            file_error = picks.into_iter().flatten().next();
        }
    });

    file_error
}

pub fn colaborador(ui: &mut Ui, forms: &mut ColaboradorForms, step: usize) -> Option<String> {
    let mut file_error = None;

    grid(ui, "colaborador_step", |ui| match step {
        1 => {
            credentials_rows(ui, &mut forms.credentials);
            date_row(ui, "colaborador_nascimento", "Nascimento:", &mut forms.geral.nascimento);
            text_row(ui, "Telefone:", &mut forms.geral.telefone);
            text_row(ui, "Endereço:", &mut forms.geral.endereco);
            text_row(ui, "Cidade:", &mut forms.geral.cidade);
        }
        2 => {
            let profissional = &mut forms.profissional;
            text_row(ui, "Formação:", &mut profissional.formacao);
            text_row(ui, "Especialidade:", &mut profissional.especialidade);
            resposta_row(ui, "colaborador_registro", "Possui registro em conselho?", &mut profissional.possui_registro);
            if profissional.registro_enabled() {
                text_row(ui, "Número do registro:", &mut profissional.registro_conselho);
            }
        }
        _ => {
            let picks = [
                file_row(ui, "Foto:", &mut forms.foto, IMAGE_EXTENSIONS),
                file_row(ui, "RG (documento):", &mut forms.rgdoc, DOCUMENT_EXTENSIONS),
                file_row(ui, "Comprovante de residência:", &mut forms.compres, DOCUMENT_EXTENSIONS),
            ];
            file_error = picks.into_iter().flatten().next();
        }
    });

    file_error
}

pub fn gerente(ui: &mut Ui, forms: &mut GerenteForms, step: usize) -> Option<String> {
    let mut file_error = None;

    grid(ui, "gerente_step", |ui| {
        if step == 1 {
            credentials_rows(ui, &mut forms.credentials);
            text_row(ui, "Cargo:", &mut forms.geral.cargo);
            text_row(ui, "Telefone:", &mut forms.geral.telefone);
            text_row(ui, "Endereço:", &mut forms.geral.endereco);
        } else {
            file_error = file_row(ui, "Foto:", &mut forms.foto, IMAGE_EXTENSIONS);
        }
    });

    file_error
}

pub fn unidade(ui: &mut Ui, form: &mut UnidadeForm, _step: usize) -> Option<String> {
    grid(ui, "unidade_step", |ui| {
        text_row(ui, "Nome:", &mut form.nome);
        text_row(ui, "Endereço:", &mut form.endereco);
    });
    None
}
