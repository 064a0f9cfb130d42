use std::sync::Arc;

use aws_sdk_kms::Client as KmsClient;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use backend::{
    note_cipher::KmsNoteCipher,
    note_storage::S3ObjectStore,
    notes::{NoteReader, NoteWriter},
    secrets::SecretsManagerResolver,
    server,
    types::Environment,
};
use jotnook_types::SystemClock;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // JSON logs for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt().json().with_env_filter(env_filter).init();
        }
        Environment::Development => {
            fmt().with_env_filter(env_filter).init();
        }
    }

    let aws_config = environment.aws_config().await;
    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let kms_client = KmsClient::new(&aws_config);
    let secrets_client = SecretsManagerClient::new(&aws_config);

    let secrets = Arc::new(SecretsManagerResolver::new(
        secrets_client,
        environment.secret_id(),
    ));
    let store = Arc::new(S3ObjectStore::new(s3_client));
    let cipher = Arc::new(KmsNoteCipher::new(kms_client));

    let writer = Arc::new(NoteWriter::new(
        secrets.clone(),
        store.clone(),
        cipher.clone(),
        Arc::new(SystemClock),
    ));
    let reader = Arc::new(NoteReader::new(secrets, store, cipher));

    server::start(environment, writer, reader).await
}
