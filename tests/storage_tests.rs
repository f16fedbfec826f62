use cms_portal::storage::{MockStorageService, S3StorageClient, StorageService};
use uuid::Uuid;

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_presign_success() {
        let mock = MockStorageService::new();
        let key = "uploads/portada.jpg";
        let result = mock.get_presigned_upload_url(key, "image/jpeg").await;
        assert!(result.is_ok());

        let url = result.unwrap();
        assert!(url.contains("signature=fake"));
        assert!(url.contains(key));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockStorageService::new_failing();
        assert!(
            mock.get_presigned_upload_url("uploads/portada.jpg", "image/jpeg")
                .await
                .is_err()
        );
        assert!(mock.list_objects(None).await.is_err());
        assert!(mock.delete_object("uploads/portada.jpg").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_sanitization() {
        let mock = MockStorageService::new();
        let result = mock
            .get_presigned_upload_url("../../etc/passwd", "text/plain")
            .await;
        assert!(result.is_ok());

        // Traversal segments are stripped from the signed key.
        assert!(!result.unwrap().contains(".."));
    }

    #[tokio::test]
    async fn test_mock_listing_and_deletion() {
        let mock = MockStorageService::new()
            .with_object("cloud/informe.pdf", 2048)
            .with_object("cloud/acta.pdf", 512)
            .with_object("uploads/foto.png", 128);

        let all = mock.list_objects(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let cloud_only = mock.list_objects(Some("cloud/".to_string())).await.unwrap();
        assert_eq!(cloud_only.len(), 2);

        mock.delete_object("cloud/acta.pdf").await.unwrap();
        let cloud_only = mock.list_objects(Some("cloud/".to_string())).await.unwrap();
        assert_eq!(cloud_only.len(), 1);
        assert_eq!(cloud_only[0].key, "cloud/informe.pdf");
    }
}

#[cfg(test)]
mod s3_tests {
    use super::*;

    #[tokio::test]
    async fn test_s3_client_creation() {
        let _client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
        )
        .await;
        // Construction must not panic or touch the network.
    }

    #[tokio::test]
    async fn test_s3_presigned_url_format() {
        let client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "testkey",
            "testsecret",
            "testbucket",
        )
        .await;

        // Presigning is local computation; no bucket needs to exist.
        let key = format!("cloud/informe-{}.pdf", Uuid::new_v4());
        let result = client
            .get_presigned_upload_url(&key, "application/pdf")
            .await;
        assert!(result.is_ok());

        let url = result.unwrap();
        assert!(url.contains("localhost:9000"));
        assert!(url.contains(&key));
    }
}
