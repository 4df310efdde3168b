//! Tests du moteur : séquences de touches -> pile / mode / affichage.
//!
//! Les touches sont données par leurs étiquettes ("5", "ent", "y^x"...),
//! comme les enverrait l’interface.

use super::format::analyser;
use super::mode::Mode;
use super::moteur::{Affichage, Moteur, INVITE_DECIMALES, INVITE_REGISTRE};
use super::persistance::{cles, Stockage, StockageMemoire};
use super::reglages::{Reglages, UniteAngle};
use super::touches::Touche;

/* ------------------------ Helpers ------------------------ */

#[derive(Default)]
struct Ecran {
    x: String,
    registres: String,
    statut: String,
    rendus: usize,
}

impl Affichage for Ecran {
    fn afficher_x(&mut self, texte: &str) {
        self.x = texte.to_string();
        self.rendus += 1;
    }
    fn afficher_registres(&mut self, texte: &str) {
        self.registres = texte.to_string();
    }
    fn afficher_statut(&mut self, texte: &str) {
        self.statut = texte.to_string();
    }
}

fn moteur() -> Moteur<StockageMemoire> {
    Moteur::new(StockageMemoire::default())
}

fn touche(libelle: &str) -> Touche {
    libelle
        .parse()
        .unwrap_or_else(|e| panic!("libelle={libelle:?}: {e}"))
}

/// Presse une suite d’étiquettes séparées par des espaces.
fn presser(m: &mut Moteur<StockageMemoire>, sequence: &str) -> Ecran {
    let mut ecran = Ecran::default();
    for l in sequence.split_whitespace() {
        m.presser(touche(l), &mut ecran);
    }
    ecran
}

fn assert_proche(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "attendu {b}, obtenu {a}");
}

/* ------------------------ Propriétés de base ------------------------ */

#[test]
fn enter_puis_saisie_pousse_x_en_y() {
    let mut m = moteur();
    presser(&mut m, "5 ent 3");
    assert_eq!(m.pile().valeurs(), [3.0, 5.0, 0.0, 0.0]);
    assert_eq!(m.mode(), Mode::Saisie);
}

#[test]
fn addition_et_puissance() {
    let mut m = moteur();
    presser(&mut m, "5 ent 3 +");
    assert_eq!(m.pile().x(), 8.0);
    assert_eq!(m.mode(), Mode::Conserve);

    let mut m = moteur();
    presser(&mut m, "2 ent 3 y^x");
    assert_eq!(m.pile().x(), 8.0);
}

#[test]
fn resultat_pousse_par_la_saisie_suivante() {
    let mut m = moteur();
    presser(&mut m, "5 ent 3 + 2");
    assert_eq!(m.pile().valeurs(), [2.0, 8.0, 0.0, 0.0]);
    presser(&mut m, "*");
    assert_eq!(m.pile().x(), 16.0);
}

#[test]
fn binaire_duplique_le_bas_de_pile() {
    let mut m = moteur();
    presser(&mut m, "1 ent 2 ent 3 ent 4 -");
    assert_eq!(m.pile().valeurs(), [-1.0, 2.0, 1.0, 1.0]);
}

#[test]
fn saisie_decimale_et_caractere_refuse() {
    let mut m = moteur();
    let e = presser(&mut m, "1 . 2 . 5");
    assert_eq!(e.x, "1.25");
    assert_eq!(m.pile().x(), 1.25);
}

#[test]
fn point_en_premier() {
    let mut m = moteur();
    let e = presser(&mut m, ". 5");
    assert_eq!(e.x, "0.5");
    assert_eq!(m.pile().x(), 0.5);
}

#[test]
fn memoire_stocker_rappeler() {
    let mut m = moteur();
    presser(&mut m, "7 sto 4");
    assert_eq!(m.memoire().rappeler(4), 7.0);
    assert_eq!(m.mode(), Mode::Conserve);

    presser(&mut m, "clr 2 rcl 4");
    assert_eq!(m.pile().valeurs(), [7.0, 2.0, 0.0, 0.0]);
    assert_eq!(m.mode(), Mode::Conserve);
}

#[test]
fn invites_affichees() {
    let mut m = moteur();
    let e = presser(&mut m, "sto");
    assert_eq!(e.x, INVITE_REGISTRE);
    let mut m = moteur();
    let e = presser(&mut m, "plcs");
    assert_eq!(e.x, INVITE_DECIMALES);
}

#[test]
fn rappel_et_decimales_refusent_les_non_chiffres() {
    for (invite, mode) in [("rcl", Mode::MemoireRappeler), ("plcs", Mode::Decimales)] {
        let mut m = moteur();
        presser(&mut m, &format!("7 {invite}"));
        let mut e = Ecran::default();
        for l in ["+", ".", "clr", "ent", "sin", "show", "<-", "sto", "rcl"] {
            assert!(!m.presser(touche(l), &mut e), "{invite}: touche {l:?} acceptée");
            assert_eq!(m.mode(), mode);
        }
        assert_eq!(e.rendus, 0);
        assert_eq!(m.pile().valeurs(), [7.0, 0.0, 0.0, 0.0]);
        assert!(m.presser(touche("3"), &mut e));
        assert_eq!(m.mode(), Mode::Conserve);
    }
}

#[test]
fn modes_invite_refusent_les_non_chiffres() {
    let mut m = moteur();
    presser(&mut m, "7 sto");
    let mut e = Ecran::default();
    for l in ["+", ".", "clr", "ent", "sin", "show", "<-"] {
        assert!(!m.presser(touche(l), &mut e), "touche {l:?} acceptée");
        assert_eq!(m.mode(), Mode::MemoireStocker);
    }
    assert_eq!(e.rendus, 0);
    assert_eq!(m.pile().x(), 7.0);
    assert!(m.presser(touche("0"), &mut e));
    assert_eq!(m.memoire().rappeler(0), 7.0);
}

#[test]
fn decimales_par_touche() {
    let mut m = moteur();
    let e = presser(&mut m, "2 plcs 2");
    assert_eq!(e.x, "2.00");
    assert_eq!(e.statut, "fix 2 deg");
    assert_eq!(m.reglages().decimales, 2);
    assert_eq!(m.mode(), Mode::Conserve);
}

/* ------------------------ Retour arrière ------------------------ */

#[test]
fn retour_arriere_en_saisie() {
    let mut m = moteur();
    let e = presser(&mut m, "1 2 3 <-");
    assert_eq!(e.x, "12");
    assert_eq!(m.pile().x(), 12.0);
    assert_eq!(m.mode(), Mode::Saisie);
}

#[test]
fn retour_arriere_sur_un_seul_chiffre() {
    let mut m = moteur();
    let e = presser(&mut m, "5 <-");
    assert!(!e.x.is_empty());
    assert_eq!(m.pile().x(), 0.0);
    assert_eq!(m.mode(), Mode::Remplace);
}

#[test]
fn retour_arriere_ne_laisse_pas_un_signe_seul() {
    let mut m = moteur();
    presser(&mut m, "5 chs");
    assert_eq!(m.pile().tampon(), "-5");
    presser(&mut m, "<-");
    assert_eq!(m.pile().x(), 0.0);
    assert_eq!(m.mode(), Mode::Remplace);
}

#[test]
fn retour_arriere_en_mode_conserve() {
    let mut m = moteur();
    presser(&mut m, "5 ent 3 + <-");
    assert_eq!(m.pile().valeurs(), [0.0, 0.0, 0.0, 0.0]);
    assert_eq!(m.mode(), Mode::Remplace);
    presser(&mut m, "4");
    assert_eq!(m.pile().valeurs(), [4.0, 0.0, 0.0, 0.0]);
}

/* ------------------------ Exposant ------------------------ */

#[test]
fn saisie_d_exposant() {
    let mut m = moteur();
    let e = presser(&mut m, "1 . 5 exp 3");
    assert_eq!(e.x, "1.5 x10^3");
    assert_eq!(m.pile().x(), 1500.0);
    assert_eq!(m.mode(), Mode::Exposant);

    presser(&mut m, ". 2");
    assert_eq!(m.pile().tampon(), "1.5 x10^32");
}

#[test]
fn exposant_depuis_conserve_pousse_et_part_de_un() {
    let mut m = moteur();
    presser(&mut m, "4 ent 4 + exp");
    assert_eq!(m.pile().tampon(), "1 x10^0");
    assert_eq!(m.pile().valeurs(), [1.0, 8.0, 0.0, 0.0]);
    presser(&mut m, "exp");
    assert_eq!(m.pile().tampon(), "1 x10^0");
}

#[test]
fn changer_signe_de_l_exposant() {
    let mut m = moteur();
    presser(&mut m, "2 exp 5 chs");
    assert_eq!(m.pile().tampon(), "2 x10^-5");
    assert_proche(m.pile().x(), 2e-5);
    presser(&mut m, "chs");
    assert_eq!(m.pile().tampon(), "2 x10^5");
}

#[test]
fn retour_arriere_en_exposant() {
    let mut m = moteur();
    presser(&mut m, "2 exp 1 2");
    assert_eq!(m.pile().tampon(), "2 x10^12");

    presser(&mut m, "<-");
    assert_eq!(m.pile().tampon(), "2 x10^1");
    presser(&mut m, "<-");
    assert_eq!(m.pile().tampon(), "2 x10^0");
    assert_eq!(m.mode(), Mode::Exposant);

    presser(&mut m, "<-");
    assert_eq!(m.pile().tampon(), "2");
    assert_eq!(m.mode(), Mode::Saisie);
    assert_eq!(m.pile().x(), 2.0);
}

#[test]
fn retour_arriere_exposant_negatif() {
    let mut m = moteur();
    presser(&mut m, "3 exp chs 7 <-");
    assert_eq!(m.pile().tampon(), "3 x10^-0");
    presser(&mut m, "<-");
    assert_eq!(m.pile().tampon(), "3");
}

#[test]
fn operateur_ferme_l_exposant() {
    let mut m = moteur();
    presser(&mut m, "1 ent 2 exp 2 +");
    assert_eq!(m.pile().x(), 201.0);
    assert_eq!(m.mode(), Mode::Conserve);
}

/* ------------------------ Signe ------------------------ */

#[test]
fn changer_signe_en_saisie_et_en_conserve() {
    let mut m = moteur();
    presser(&mut m, "4 chs");
    assert_eq!(m.pile().x(), -4.0);
    assert_eq!(m.mode(), Mode::Saisie);
    presser(&mut m, "chs");
    assert_eq!(m.pile().x(), 4.0);

    let mut m = moteur();
    presser(&mut m, "2 ent 3 + chs");
    assert_eq!(m.pile().tampon(), "-5.0000");
    assert_eq!(m.pile().x(), -5.0);
    assert_eq!(m.mode(), Mode::Conserve);
}

/* ------------------------ Pile ------------------------ */

#[test]
fn rotations_echange_effacement() {
    let mut m = moteur();
    presser(&mut m, "1 ent 2 ent 3 ent 4");
    assert_eq!(m.pile().valeurs(), [4.0, 3.0, 2.0, 1.0]);
    presser(&mut m, "r<");
    assert_eq!(m.pile().valeurs(), [3.0, 2.0, 1.0, 4.0]);
    presser(&mut m, "r> r>");
    assert_eq!(m.pile().valeurs(), [1.0, 4.0, 3.0, 2.0]);
    presser(&mut m, "x<>y");
    assert_eq!(m.pile().valeurs(), [4.0, 1.0, 3.0, 2.0]);
    assert_eq!(m.mode(), Mode::Conserve);
    presser(&mut m, "clr");
    assert_eq!(m.pile().valeurs(), [0.0; 4]);
}

#[test]
fn pi_pousse_sans_consommer() {
    let mut m = moteur();
    presser(&mut m, "2 pi");
    assert_eq!(m.pile().valeurs(), [std::f64::consts::PI, 2.0, 0.0, 0.0]);
    presser(&mut m, "*");
    assert_proche(m.pile().x(), 2.0 * std::f64::consts::PI);
}

#[test]
fn registres_affiches_puis_masques() {
    let mut m = moteur();
    let e = presser(&mut m, "1 ent 2 ent 3");
    assert_eq!(e.registres, "0.0000\n1.0000\n2.0000");
    let e = presser(&mut m, "reg");
    assert_eq!(e.registres, "");
    assert_eq!(m.mode(), Mode::Saisie);
}

/* ------------------------ Angles / notation ------------------------ */

#[test]
fn sinus_selon_unite() {
    let mut m = moteur();
    presser(&mut m, "9 0 sin");
    assert_proche(m.pile().x(), 1.0);

    let mut m = moteur();
    let e = presser(&mut m, "deg");
    assert_eq!(e.statut, "fix 4 rad");
    presser(&mut m, "pi 2 / sin");
    assert_proche(m.pile().x(), 1.0);

    let e = presser(&mut m, "deg");
    assert_eq!(e.statut, "fix 4 grad");
    let e = presser(&mut m, "deg");
    assert_eq!(e.statut, "fix 4 deg");
}

#[test]
fn unite_angle_ne_ferme_pas_la_saisie() {
    let mut m = moteur();
    presser(&mut m, "1 deg 2");
    assert_eq!(m.pile().tampon(), "12");
    assert_eq!(m.mode(), Mode::Saisie);
}

#[test]
fn double_bascule_scientifique_idempotente() {
    let mut m = moteur();
    let e0 = presser(&mut m, "1 2 3 4 . 5 ent");
    let e1 = presser(&mut m, "sci");
    assert_eq!(e1.x, "1.2345 x10^3");
    assert_eq!(e1.statut, "sci 4 deg");
    let e2 = presser(&mut m, "sci");
    assert_eq!(e2.x, e0.x);
}

#[test]
fn grands_et_petits_nombres_en_scientifique() {
    let mut m = moteur();
    let e = presser(&mut m, "1 0 0 0 0 ent x^2");
    assert_eq!(e.x, "1.0000 x10^8");
    let e = presser(&mut m, "rcip");
    assert_eq!(e.x, "1.0000 x10^-8");
}

/* ------------------------ Aperçu pleine précision ------------------------ */

#[test]
fn apercu_ponctuel() {
    let mut m = moteur();
    presser(&mut m, "2 sqrt");
    let normal = m.pile().tampon().to_string();
    assert_eq!(normal, "1.4142");

    let e = presser(&mut m, "show");
    assert_eq!(e.x, "1.41421356237 x10^0");
    assert_eq!(m.pile().tampon(), normal);
    assert_eq!(m.apercu().as_deref(), Some("1.41421356237 x10^0"));

    let e = presser(&mut m, "show");
    assert_eq!(e.x, normal);

    presser(&mut m, "show");
    let e = presser(&mut m, "x^2");
    assert!(m.apercu().is_none());
    assert_eq!(e.x, "2.0000");
}

/* ------------------------ Domaines invalides ------------------------ */

#[test]
fn domaines_invalides_sans_erreur() {
    let mut m = moteur();
    let e = presser(&mut m, "1 ent 0 /");
    assert_eq!(e.x, "Infinity");
    let e = presser(&mut m, "chs");
    assert_eq!(e.x, "-Infinity");
    let e = presser(&mut m, "clr 1 chs ln");
    assert_eq!(e.x, "NaN");
    // pas de "-NaN"
    let e = presser(&mut m, "chs");
    assert_eq!(e.x, "NaN");
    // la calculatrice reste utilisable
    presser(&mut m, "clr 2 ent 2 +");
    assert_eq!(m.pile().x(), 4.0);
}

/* ------------------------ Persistance ------------------------ */

#[test]
fn reglages_sauves_a_chaque_changement() {
    let mut m = moteur();
    presser(&mut m, "deg sci 3 sto 9 plcs 6");
    let st = m.stockage();
    assert_eq!(st.lire(cles::UNITE_ANGLE).as_deref(), Some("rad"));
    assert_eq!(st.lire(cles::SCIENTIFIQUE).as_deref(), Some("true"));
    assert_eq!(st.lire(cles::DECIMALES).as_deref(), Some("6"));
    let memoire = st.lire(cles::MEMOIRE).unwrap_or_default();
    assert!(memoire.ends_with("\"3.0\"]"), "memoire={memoire}");
}

#[test]
fn infini_conserve_au_redemarrage() {
    let mut m = moteur();
    presser(&mut m, "5 sto 2 1 ent 0 / sto 0");
    assert_eq!(m.pile().x(), f64::INFINITY);

    let m2 = Moteur::new(m.stockage().clone());
    assert_eq!(m2.memoire().rappeler(0), f64::INFINITY);
    assert_eq!(m2.memoire().rappeler(2), 5.0);
    assert_eq!(m2.pile().valeurs(), [f64::INFINITY, 5.0, 0.0, 0.0]);
    assert_eq!(m2.pile().tampon(), "Infinity");
}

#[test]
fn nan_en_memoire_n_efface_pas_les_autres_cases() {
    let mut m = moteur();
    presser(&mut m, "7 sto 9 clr 1 chs ln sto 4");
    assert!(m.pile().x().is_nan());

    let mut m2 = Moteur::new(m.stockage().clone());
    assert!(m2.memoire().rappeler(4).is_nan());
    assert_eq!(m2.memoire().rappeler(9), 7.0);
    let e = presser(&mut m2, "rcl 4");
    assert_eq!(e.x, "NaN");
}

#[test]
fn pile_restauree_au_demarrage() {
    let mut m = moteur();
    presser(&mut m, "6 ent 7");
    let st = m.stockage().clone();

    let m2 = Moteur::new(st);
    assert_eq!(m2.pile().valeurs(), [7.0, 6.0, 0.0, 0.0]);
    assert_eq!(m2.pile().tampon(), "7.0000");
    assert_eq!(m2.mode(), Mode::Conserve);
}

#[test]
fn pile_non_conservee_si_desactivee() {
    let st = StockageMemoire::avec(&[
        (cles::CONSERVER_PILE, "false"),
        (cles::PILE, "[1, 2, 3, 4]"),
    ]);
    let mut m = Moteur::new(st);
    assert_eq!(m.pile().valeurs(), [0.0; 4]);

    presser(&mut m, "9");
    assert_eq!(m.stockage().lire(cles::PILE).as_deref(), Some("[1, 2, 3, 4]"));
}

#[test]
fn donnees_corrompues_au_demarrage() {
    let st = StockageMemoire::avec(&[
        (cles::UNITE_ANGLE, "tours"),
        (cles::DECIMALES, "dix"),
        (cles::MEMOIRE, "[1,2]"),
        (cles::PILE, "{\"x\": 1}"),
    ]);
    let m = Moteur::new(st);
    assert_eq!(*m.reglages(), Reglages::default());
    assert_eq!(m.pile().valeurs(), [0.0; 4]);
    assert_eq!(m.memoire().rappeler(0), 0.0);
}

#[test]
fn formulaire_d_options() {
    let mut m = moteur();
    presser(&mut m, "1 2");
    m.appliquer_options(Reglages {
        unite_angle: UniteAngle::Grades,
        decimales: 42,
        scientifique: true,
        afficher_registres: false,
        conserver_pile: false,
    });
    assert_eq!(m.reglages().decimales, 9);
    assert_eq!(m.mode(), Mode::Conserve);
    assert_eq!(m.pile().tampon(), "1.200000000 x10^1");
    assert_eq!(m.texte_registres(), "");
    assert_eq!(m.statut(), "sci 9 grad");
    assert_eq!(m.options().unite_angle, UniteAngle::Grades);
    assert_eq!(
        m.stockage().lire(cles::CONSERVER_PILE).as_deref(),
        Some("false")
    );
}

/* ------------------------ Cohérence tampon / X ------------------------ */

#[test]
fn tampon_relu_egal_x_hors_invites() {
    let mut m = moteur();
    for sequence in ["1 2 . 5", "3 exp 4 chs", "7 ent 2 /", "2 sqrt sci", "pi 1 0 0 0 0 0 0 0 *"] {
        presser(&mut m, &format!("clr {sequence}"));
        let relu = analyser(m.pile().tampon()).unwrap_or_else(|e| panic!("{sequence}: {e}"));
        let x = m.pile().x();
        assert!(
            (relu - x).abs() <= 1e-4 * x.abs().max(1.0),
            "sequence={sequence:?} relu={relu} x={x}"
        );
    }
}
