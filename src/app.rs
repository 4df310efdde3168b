// src/app.rs
//
// rpCalc : module App (racine)
// ----------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs + stockage.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Clavier physique : texte tapé -> Clavier (préfixes), Enter -> "ent", Backspace -> "<-".
// Ignoré tant que la fenêtre d’options est ouverte (ses champs ont la main).

pub mod etat;
pub mod stockage;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.options_ouvertes {
            let evenements = ctx.input(|i| i.events.clone());
            for ev in evenements {
                match ev {
                    egui::Event::Text(texte) => {
                        for c in texte.chars() {
                            self.taper(c);
                        }
                    }
                    egui::Event::Key {
                        key: egui::Key::Enter,
                        pressed: true,
                        ..
                    } => self.taper('\r'),
                    egui::Event::Key {
                        key: egui::Key::Backspace,
                        pressed: true,
                        ..
                    } => self.retour_arriere_clavier(),
                    _ => {}
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
