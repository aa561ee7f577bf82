use derive_new::new;
use serde::{Deserialize, Serialize};


#[derive(Clone, PartialEq, Eq, Debug, new, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
}
