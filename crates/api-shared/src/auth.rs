/// Checks the `x-api-key` value of a request against the key configured at startup.
///
/// With no key configured the gRPC surface is open and every request passes.
#[allow(clippy::result_large_err)]
pub fn validate_api_key(
    provided_key: Option<&str>,
    expected_key: Option<&str>,
) -> Result<(), tonic::Status> {
    let Some(expected_key) = expected_key else {
        return Ok(());
    };

    match provided_key {
        Some(key) if key == expected_key => Ok(()),
        Some(_) => Err(tonic::Status::unauthenticated("Invalid API key")),
        None => Err(tonic::Status::unauthenticated("Missing x-api-key header")),
    }
}
