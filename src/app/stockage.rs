// src/app/stockage.rs
//
// Adaptateurs du port `Stockage` (natif + web)
// --------------------------------------------
// - NATIF : un fichier JSON versionné (clé -> texte), réécrit à chaque sauvegarde
// - WEB   : window.localStorage
// - repli : magasin en mémoire (rien n’est conservé entre deux lancements)
//
// Fichier absent, illisible ou d’une autre version => magasin vide (les défauts s’appliquent).

use crate::noyau::{Stockage, StockageMemoire};

/// Magasin par défaut de la plateforme courante.
pub fn par_defaut() -> Box<dyn Stockage> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        match natif::chemin_par_defaut() {
            Some(chemin) => Box::new(natif::StockageFichier::ouvrir(chemin)),
            None => {
                tracing::warn!("aucun dossier de configuration : réglages non conservés");
                Box::new(StockageMemoire::default())
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        match web::StockageLocal::ouvrir() {
            Ok(s) => Box::new(s),
            Err(e) => {
                tracing::warn!("localStorage indisponible: {e}");
                Box::new(StockageMemoire::default())
            }
        }
    }
}

/* ------------------------ NATIF : fichier JSON ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
pub mod natif {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Serialize};
    use tracing::{debug, warn};

    use crate::noyau::{ErreurStockage, Stockage};

    /// Variable d’environnement qui remplace l’emplacement par défaut.
    pub const VAR_FICHIER: &str = "RPCALC_FICHIER";

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Contenu {
        version: u32,
        entrees: BTreeMap<String, String>,
    }

    impl Contenu {
        const VERSION: u32 = 1;
    }

    /// `$RPCALC_FICHIER`, sinon `<config>/rpcalc/reglages.json`.
    pub fn chemin_par_defaut() -> Option<PathBuf> {
        if let Some(chemin) = std::env::var_os(VAR_FICHIER) {
            return Some(PathBuf::from(chemin));
        }
        dirs::config_dir().map(|d| d.join("rpcalc").join("reglages.json"))
    }

    #[derive(Debug)]
    pub struct StockageFichier {
        chemin: PathBuf,
        entrees: BTreeMap<String, String>,
    }

    impl StockageFichier {
        /// Ne peut pas échouer : tout problème de lecture donne un magasin vide.
        pub fn ouvrir(chemin: PathBuf) -> Self {
            let entrees = match lire_fichier(&chemin) {
                Ok(Some(e)) => e,
                Ok(None) => BTreeMap::new(),
                Err(e) => {
                    warn!(chemin = %chemin.display(), "fichier de réglages ignoré: {e}");
                    BTreeMap::new()
                }
            };
            debug!(chemin = %chemin.display(), n = entrees.len(), "réglages ouverts");
            Self { chemin, entrees }
        }

        pub fn chemin(&self) -> &Path {
            &self.chemin
        }
    }

    fn lire_fichier(chemin: &Path) -> Result<Option<BTreeMap<String, String>>, ErreurStockage> {
        let octets = match fs::read(chemin) {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let contenu: Contenu = serde_json::from_slice(&octets)?;
        if contenu.version != Contenu::VERSION {
            warn!(version = contenu.version, "version de réglages inconnue");
            return Ok(None);
        }
        Ok(Some(contenu.entrees))
    }

    impl Stockage for StockageFichier {
        fn lire(&self, cle: &str) -> Option<String> {
            self.entrees.get(cle).cloned()
        }

        fn ecrire(&mut self, cle: &str, valeur: &str) -> Result<(), ErreurStockage> {
            if self.entrees.get(cle).map(String::as_str) == Some(valeur) {
                return Ok(());
            }
            self.entrees.insert(cle.to_string(), valeur.to_string());

            let contenu = Contenu {
                version: Contenu::VERSION,
                entrees: self.entrees.clone(),
            };
            if let Some(dossier) = self.chemin.parent() {
                fs::create_dir_all(dossier)?;
            }
            fs::write(&self.chemin, serde_json::to_vec_pretty(&contenu)?)?;
            Ok(())
        }
    }

}

/* ------------------------ WEB : localStorage ------------------------ */

#[cfg(target_arch = "wasm32")]
pub mod web {
    use crate::noyau::{ErreurStockage, Stockage};

    pub struct StockageLocal {
        local: web_sys::Storage,
    }

    impl StockageLocal {
        pub fn ouvrir() -> Result<Self, ErreurStockage> {
            let w = web_sys::window()
                .ok_or_else(|| ErreurStockage::Navigateur("window() indisponible".into()))?;
            let local = w
                .local_storage()
                .map_err(|e| ErreurStockage::Navigateur(format!("{e:?}")))?
                .ok_or_else(|| ErreurStockage::Navigateur("localStorage absent".into()))?;
            Ok(Self { local })
        }
    }

    impl Stockage for StockageLocal {
        fn lire(&self, cle: &str) -> Option<String> {
            self.local.get_item(cle).ok().flatten()
        }

        fn ecrire(&mut self, cle: &str, valeur: &str) -> Result<(), ErreurStockage> {
            self.local
                .set_item(cle, valeur)
                .map_err(|e| ErreurStockage::Navigateur(format!("{e:?}")))
        }
    }
}
