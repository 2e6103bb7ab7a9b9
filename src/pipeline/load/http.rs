use crate::error::LoadError;

pub async fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    let client = reqwest::Client::new();
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }

    Ok(response.bytes().await?.to_vec())
}
