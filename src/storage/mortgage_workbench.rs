use crate::domain::{
    Amount, ApplicationId, ApplicationStatus, LedgerError, MortgageApplication, MortgageRequest,
    User,
};

/// Holds every mortgage application in submission order.
#[derive(Debug, Default)]
pub struct MortgageWorkbench {
    applications: Vec<MortgageApplication>,
}

impl MortgageWorkbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new application in the pending state.
    /// Incomplete submissions are discarded.
    pub fn submit(
        &mut self,
        applicant: Option<&User>,
        property_value: Amount,
        loan_amount: Amount,
        interest_rate: f64,
    ) -> Result<&MortgageApplication, LedgerError> {
        let request = MortgageRequest {
            applicant: applicant.map(|user| user.id),
            property_value,
            loan_amount,
            interest_rate,
        };
        let application = request.into_application()?;
        Ok(self.push(application))
    }

    /// Register an application loaded at startup.
    pub fn insert(
        &mut self,
        application: MortgageApplication,
    ) -> Result<&MortgageApplication, LedgerError> {
        let request = MortgageRequest {
            applicant: Some(application.applicant),
            property_value: application.property_value,
            loan_amount: application.loan_amount,
            interest_rate: application.interest_rate,
        };
        if request.is_incomplete() {
            return Err(LedgerError::IncompleteApplication);
        }
        if self.find_by_id(application.id).is_some() {
            return Err(LedgerError::DuplicateApplication(
                application.id.to_string(),
            ));
        }
        Ok(self.push(application))
    }

    fn push(&mut self, application: MortgageApplication) -> &MortgageApplication {
        self.applications.push(application);
        &self.applications[self.applications.len() - 1]
    }

    pub fn find_by_id(&self, id: ApplicationId) -> Option<&MortgageApplication> {
        self.applications.iter().find(|app| app.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: ApplicationId) -> Option<&mut MortgageApplication> {
        self.applications.iter_mut().find(|app| app.id == id)
    }

    pub fn find_by_status(
        &self,
        status: ApplicationStatus,
    ) -> impl Iterator<Item = &MortgageApplication> {
        self.applications
            .iter()
            .filter(move |app| app.status() == status)
    }

    pub fn approve(&mut self, id: ApplicationId) -> Result<&MortgageApplication, LedgerError> {
        self.decide(id, MortgageApplication::approve)
    }

    pub fn reject(&mut self, id: ApplicationId) -> Result<&MortgageApplication, LedgerError> {
        self.decide(id, MortgageApplication::reject)
    }

    pub fn cancel(&mut self, id: ApplicationId) -> Result<&MortgageApplication, LedgerError> {
        self.decide(id, MortgageApplication::cancel)
    }

    fn decide(
        &mut self,
        id: ApplicationId,
        action: fn(&mut MortgageApplication) -> Result<(), LedgerError>,
    ) -> Result<&MortgageApplication, LedgerError> {
        let application = self
            .find_by_id_mut(id)
            .ok_or_else(|| LedgerError::ApplicationNotFound(id.to_string()))?;
        action(application)?;
        Ok(application)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MortgageApplication> {
        self.applications.iter()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}
