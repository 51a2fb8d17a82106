use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Load a JSON vector file from `tests/vectors/`.
pub fn read_vectors<Test: DeserializeOwned>(name: &str) -> VectorFile<Test> {
    let path = format!("tests/vectors/{name}");
    let file = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {name} should succeed: {e:?}"));
    serde_json::from_str(&file).unwrap_or_else(|e| panic!("parsing {name} should succeed: {e:?}"))
}

#[derive(Deserialize)]
pub struct VectorFile<T> {
    pub tests: Vec<Vector<T>>,
}

#[derive(Deserialize)]
pub struct Vector<T> {
    pub name: String,
    #[serde(flatten)]
    pub data: T,
}
