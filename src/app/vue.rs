// src/app/vue.rs
//
// Vue (UI egui) : natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Afficheur : registres T/Z/Y, X, ligne d’état, ligne de saisie clavier
// - Pavé : un bouton par touche, libellé = identifiant de touche du noyau
// - Options : fenêtre modale simple, appliquée d’un bloc ("OK")
//
// Note :
// - Le clavier physique est géré dans app.rs (update), pas ici.

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::reglages::DECIMALES_MAX;
use crate::noyau::UniteAngle;

/// Pavé : rangées de libellés.
const PAVE: &[&[&str]] = &[
    &["x^2", "sqrt", "y^x", "xrt", "rcip"],
    &["sin", "cos", "tan", "ln", "e^x"],
    &["asin", "acos", "atan", "log", "tn^x"],
    &["sto", "rcl", "r<", "r>", "x<>y"],
    &["show", "clr", "plcs", "sci", "deg"],
    &["exp", "chs", "7", "8", "9"],
    &["pi", "/", "4", "5", "6"],
    &["<-", "*", "1", "2", "3"],
    &["ent", "-", "0", ".", "+"],
];

const TAILLE_BOUTON: [f32; 2] = [64.0, 34.0];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.ui_afficheur(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_pave(ui);

                ui.add_space(8.0);
                if ui.button("Options…").clicked() {
                    self.ouvrir_options();
                }
            });

        self.ui_options(ui.ctx());
    }

    fn ui_afficheur(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    if !self.ecran.registres.is_empty() {
                        for ligne in self.ecran.registres.lines() {
                            ui.monospace(ligne);
                        }
                        ui.separator();
                    }
                    ui.label(
                        egui::RichText::new(&self.ecran.x)
                            .monospace()
                            .size(22.0)
                            .strong(),
                    );
                });
            });

        ui.horizontal(|ui| {
            ui.monospace(&self.ecran.statut);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(self.ligne_saisie());
            });
        });
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_rpcalc")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in PAVE {
                    for libelle in rangee.iter() {
                        if ui
                            .add_sized(TAILLE_BOUTON, egui::Button::new(*libelle))
                            .clicked()
                        {
                            self.presser_libelle(libelle);
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn ui_options(&mut self, ctx: &egui::Context) {
        if !self.options_ouvertes {
            return;
        }

        let mut ok = false;
        let mut annuler = false;

        egui::Window::new("Options")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let b = &mut self.brouillon;

                ui.checkbox(&mut b.afficher_registres, "Afficher les registres");
                ui.checkbox(&mut b.scientifique, "Notation scientifique");
                ui.checkbox(&mut b.conserver_pile, "Conserver la pile");

                ui.horizontal(|ui| {
                    ui.label("Décimales :");
                    ui.add(
                        egui::DragValue::new(&mut b.decimales)
                            .speed(1)
                            .range(0..=DECIMALES_MAX),
                    );
                });

                ui.horizontal(|ui| {
                    ui.label("Angles :");
                    egui::ComboBox::from_id_salt("unite_angle")
                        .selected_text(b.unite_angle.to_string())
                        .show_ui(ui, |ui| {
                            for u in UniteAngle::TOUTES {
                                ui.selectable_value(&mut b.unite_angle, u, u.to_string());
                            }
                        });
                });

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ok = ui.button("OK").clicked();
                    annuler = ui.button("Annuler").clicked();
                });
            });

        if ok {
            self.valider_options();
        } else if annuler {
            self.annuler_options();
        }
    }
}
