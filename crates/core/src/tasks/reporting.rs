//! Steps for reporting test results
//!
//! Screenshots are uploaded to Cloudinary and their secure URLs are
//! attached to a comment posted on the extension's Github pull request.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::blocking::{multipart, Client};
use sha2::{Digest, Sha256};

use crate::output::{task_error, task_info};
use crate::tasks::cms_setup::is_valid_repository;

const TASK_NAME: &str = "Reporting";

/// Step provider for publishing images and pull request comments
pub struct Reporting {
    cloudinary_cloud_name: String,
    cloudinary_api_key: String,
    cloudinary_api_secret: String,
    github_token: String,
    github_repo: String,
    github_pr: u64,
    images_to_upload: Vec<String>,
    folder_images_to_upload: String,
    github_comment_body: String,
    // Filled by publish_images, consumed by publish_github_comment
    uploaded_image_urls: RefCell<Vec<String>>,
}

impl Reporting {
    pub fn new() -> Self {
        Self {
            cloudinary_cloud_name: String::new(),
            cloudinary_api_key: String::new(),
            cloudinary_api_secret: String::new(),
            github_token: String::new(),
            github_repo: String::new(),
            github_pr: 0,
            images_to_upload: Vec::new(),
            folder_images_to_upload: String::new(),
            github_comment_body: String::new(),
            uploaded_image_urls: RefCell::new(Vec::new()),
        }
    }

    pub fn cloudinary_cloud_name(mut self, name: impl Into<String>) -> Self {
        self.cloudinary_cloud_name = name.into();
        self
    }

    pub fn cloudinary_api_key(mut self, key: impl Into<String>) -> Self {
        self.cloudinary_api_key = key.into();
        self
    }

    pub fn cloudinary_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.cloudinary_api_secret = secret.into();
        self
    }

    pub fn github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = token.into();
        self
    }

    /// Github repository (owner/repo) receiving the comment
    pub fn github_repo(mut self, repo: impl Into<String>) -> Self {
        self.github_repo = repo.into();
        self
    }

    pub fn github_pr(mut self, pr: u64) -> Self {
        self.github_pr = pr;
        self
    }

    /// Local image paths to upload
    pub fn images_to_upload(mut self, images: Vec<String>) -> Self {
        self.images_to_upload = images;
        self
    }

    /// Local folder searched for images to upload
    pub fn folder_images_to_upload(mut self, folder: impl Into<String>) -> Self {
        self.folder_images_to_upload = folder.into();
        self
    }

    pub fn github_comment_body(mut self, body: impl Into<String>) -> Self {
        self.github_comment_body = body.into();
        self
    }

    /// Seed already-uploaded image URLs, skipping the upload step
    pub fn uploaded_image_urls(self, urls: Vec<String>) -> Self {
        *self.uploaded_image_urls.borrow_mut() = urls;
        self
    }

    /// Publish the reported images to Cloudinary and store their URLs
    pub fn publish_images(&self) -> bool {
        task_info(TASK_NAME, "Uploading images to Cloudinary");

        if self.cloudinary_cloud_name.is_empty()
            || self.cloudinary_api_key.is_empty()
            || self.cloudinary_api_secret.is_empty()
        {
            task_error(TASK_NAME, "Cloudinary API data was not provided");
            return false;
        }

        let mut images = self.images_to_upload.clone();

        if !self.folder_images_to_upload.is_empty() {
            let Some(found) = search_images(Path::new(&self.folder_images_to_upload)) else {
                task_error(
                    TASK_NAME,
                    &format!(
                        "Provided folder with images to upload is not valid: {}",
                        self.folder_images_to_upload
                    ),
                );
                return false;
            };

            images.extend(found);
        }

        for image in &images {
            if !is_image(Path::new(image)) {
                task_error(
                    TASK_NAME,
                    &format!(
                        "Provided file is not a valid local image path (PNG or JPG are allowed): {}",
                        image
                    ),
                );
                return false;
            }
        }

        if images.is_empty() {
            task_error(TASK_NAME, "No valid local images were provided");
            return false;
        }

        self.uploaded_image_urls.borrow_mut().clear();
        let client = Client::new();

        for image in &images {
            match self.upload_image(&client, image) {
                Ok(url) => self.uploaded_image_urls.borrow_mut().push(url),
                Err(e) => {
                    task_error(
                        TASK_NAME,
                        &format!("Error when uploading image to Cloudinary: {}. Image path: {}", e, image),
                    );
                    return false;
                }
            }
        }

        true
    }

    /// Publish a comment into the Github PR, attaching any uploaded images
    pub fn publish_github_comment(&self) -> bool {
        task_info(TASK_NAME, "Sending comment to Github PR");

        if self.github_token.is_empty()
            || !is_valid_repository(&self.github_repo)
            || self.github_pr == 0
        {
            task_error(
                TASK_NAME,
                "Valid Github token, repository and pull request number were not provided",
            );
            return false;
        }

        if self.github_comment_body.is_empty() {
            task_error(TASK_NAME, "Github comment body was not provided");
            return false;
        }

        let mut body = self.github_comment_body.clone();

        for image in self.uploaded_image_urls.borrow().iter() {
            body.push_str(&format!("<br />![Screenshot]({})", image));
        }

        let url = format!(
            "https://api.github.com/repos/{}/issues/{}/comments",
            self.github_repo, self.github_pr
        );

        let response = Client::new()
            .post(&url)
            .header("Authorization", format!("token {}", self.github_token))
            .header("User-Agent", "testbed")
            .json(&serde_json::json!({ "body": body }))
            .send();

        match response {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                task_error(
                    TASK_NAME,
                    &format!("Github comment could not be added due to an error: HTTP {}", response.status()),
                );
                false
            }
            Err(e) => {
                task_error(TASK_NAME, &format!("Github comment could not be added due to an error: {}", e));
                false
            }
        }
    }

    fn upload_image(&self, client: &Client, image: &str) -> Result<String, String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let signature = sign_upload(timestamp, &self.cloudinary_api_secret);

        let form = multipart::Form::new()
            .file("file", image)
            .map_err(|e| e.to_string())?
            .text("api_key", self.cloudinary_api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloudinary_cloud_name
        );

        let response: serde_json::Value = client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| e.to_string())?
            .json()
            .map_err(|e| e.to_string())?;

        if let Some(error) = response.get("error") {
            return Err(error.to_string());
        }

        response
            .get("secure_url")
            .and_then(|u| u.as_str())
            .map(str::to_string)
            .ok_or_else(|| "upload response carried no secure_url".to_string())
    }
}

impl Default for Reporting {
    fn default() -> Self {
        Self::new()
    }
}

/// Signature over the upload parameters, per Cloudinary's signing scheme
fn sign_upload(timestamp: u64, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("timestamp={}{}", timestamp, api_secret));

    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_ascii_lowercase();
            ext == "jpg" || ext == "png"
        })
        .unwrap_or(false)
}

/// Collect every image found in the given folder
fn search_images(folder: &Path) -> Option<Vec<String>> {
    if !folder.is_dir() {
        return None;
    }

    let mut images = Vec::new();

    for entry in fs::read_dir(folder).ok()? {
        let path = entry.ok()?.path();

        // System files and html reports are not worth uploading
        if is_image(&path) {
            images.push(path.display().to_string());
        }
    }

    Some(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_images_requires_cloudinary_credentials() {
        let reporting = Reporting::new().images_to_upload(vec!["shot.png".to_string()]);
        assert!(!reporting.publish_images());
    }

    #[test]
    fn publish_images_rejects_non_image_paths() {
        let reporting = Reporting::new()
            .cloudinary_cloud_name("cloud")
            .cloudinary_api_key("key")
            .cloudinary_api_secret("secret")
            .images_to_upload(vec!["report.html".to_string()]);

        assert!(!reporting.publish_images());
    }

    #[test]
    fn publish_comment_requires_valid_repository_and_pr() {
        let reporting = Reporting::new()
            .github_token("token")
            .github_repo("not-a-repo")
            .github_pr(12)
            .github_comment_body("body");
        assert!(!reporting.publish_github_comment());

        let reporting = Reporting::new()
            .github_token("token")
            .github_repo("owner/repo")
            .github_pr(0)
            .github_comment_body("body");
        assert!(!reporting.publish_github_comment());
    }

    #[test]
    fn publish_comment_requires_a_body() {
        let reporting = Reporting::new()
            .github_token("token")
            .github_repo("owner/repo")
            .github_pr(12);

        assert!(!reporting.publish_github_comment());
    }

    #[test]
    fn folder_search_only_returns_images() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("shot.png"), "png").unwrap();
        fs::write(temp.path().join("photo.JPG"), "jpg").unwrap();
        fs::write(temp.path().join("report.html"), "html").unwrap();

        let mut images = search_images(temp.path()).unwrap();
        images.sort();

        assert_eq!(images.len(), 2);
        assert!(images[0].ends_with("photo.JPG"));
        assert!(images[1].ends_with("shot.png"));
    }

    #[test]
    fn upload_signature_is_stable() {
        assert_eq!(sign_upload(1, "secret"), sign_upload(1, "secret"));
        assert_ne!(sign_upload(1, "secret"), sign_upload(2, "secret"));
        assert_eq!(sign_upload(1, "secret").len(), 64);
    }
}
