use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no customer at index {index}, bank has {count}")]
    CustomerOutOfRange { index: usize, count: usize },
    #[error("no account at index {index}, customer has {count}")]
    AccountOutOfRange { index: usize, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Checking,
    Savings,
}

impl Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Checking => write!(f, "Checking"),
            AccountKind::Savings => write!(f, "Savings"),
        }
    }
}

/// An account as loaded from the customer file. Balances never change
/// after load.
#[derive(Debug, Clone, PartialEq)]
pub enum Account {
    Checking { balance: f64, overdraft_limit: f64 },
    /// `interest_rate` is a fraction, 0.05 for 5%.
    Savings { balance: f64, interest_rate: f64 },
}

impl Account {
    pub fn balance(&self) -> f64 {
        match self {
            Account::Checking { balance, .. } | Account::Savings { balance, .. } => *balance,
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            Account::Checking { .. } => AccountKind::Checking,
            Account::Savings { .. } => AccountKind::Savings,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    first_name: String,
    last_name: String,
    accounts: Vec<Account>,
}

impl Customer {
    fn new(first_name: String, last_name: String) -> Self {
        Customer {
            first_name,
            last_name,
            accounts: Vec::new(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, index: usize) -> Result<&Account, LookupError> {
        self.accounts
            .get(index)
            .ok_or(LookupError::AccountOutOfRange {
                index,
                count: self.accounts.len(),
            })
    }

    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /**
     * Folds from 0.0 rather than using Sum, which starts at -0.0
     * and would print "$-0.0" for a customer without accounts.
     */
    pub fn total_balance(&self) -> f64 {
        self.accounts
            .iter()
            .fold(0.0, |total, account| total + account.balance())
    }
}

/**
 * The registry of customers, in the order they were loaded.
 * Populated once at startup and only read afterwards.
 */
#[derive(Debug, Default)]
pub struct Bank {
    customers: Vec<Customer>,
}

impl Bank {
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn customer(&self, index: usize) -> Result<&Customer, LookupError> {
        self.customers
            .get(index)
            .ok_or(LookupError::CustomerOutOfRange {
                index,
                count: self.customers.len(),
            })
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    /// Appends a customer with no accounts and hands it back so the
    /// loader can attach accounts to it.
    pub fn add_customer(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> &mut Customer {
        self.customers
            .push(Customer::new(first_name.into(), last_name.into()));
        let last = self.customers.len() - 1;
        &mut self.customers[last]
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVINGS_100: Account = Account::Savings {
        balance: 100.0,
        interest_rate: 0.05,
    };
    const CHECKING_250: Account = Account::Checking {
        balance: 250.5,
        overdraft_limit: 500.0,
    };

    mod accounts {
        use super::*;

        #[test]
        fn balance_of_each_kind() {
            assert_eq!(SAVINGS_100.balance(), 100.0);
            assert_eq!(CHECKING_250.balance(), 250.5);
        }
        #[test]
        fn kind_labels() {
            assert_eq!(SAVINGS_100.kind(), AccountKind::Savings);
            assert_eq!(CHECKING_250.kind().to_string(), "Checking");
            assert_eq!(AccountKind::Savings.to_string(), "Savings");
        }
    }

    mod customers {
        use super::*;

        #[test]
        fn accounts_keep_insertion_order() {
            let mut bank = Bank::default();
            let customer = bank.add_customer("John", "Smith");
            customer.add_account(CHECKING_250);
            customer.add_account(SAVINGS_100);

            let customer = bank.customer(0).unwrap();
            assert_eq!(customer.accounts(), &[CHECKING_250, SAVINGS_100]);
            assert_eq!(customer.account(1), Ok(&SAVINGS_100));
        }
        #[test]
        fn total_balance_sums_all_accounts() {
            let mut bank = Bank::default();
            let customer = bank.add_customer("John", "Smith");
            customer.add_account(CHECKING_250);
            customer.add_account(SAVINGS_100);

            assert_eq!(bank.customer(0).unwrap().total_balance(), 350.5);
        }
        #[test]
        fn total_balance_without_accounts_is_positive_zero() {
            let mut bank = Bank::default();
            bank.add_customer("Jane", "Doe");

            let total = bank.customer(0).unwrap().total_balance();
            assert_eq!(total, 0.0);
            assert!(total.is_sign_positive());
        }
        #[test]
        fn missing_account_is_an_error() {
            let mut bank = Bank::default();
            bank.add_customer("Jane", "Doe");

            assert_eq!(
                bank.customer(0).unwrap().account(0),
                Err(LookupError::AccountOutOfRange { index: 0, count: 0 })
            );
        }
    }

    mod registry {
        use super::*;

        #[test]
        fn empty_by_default() {
            let bank = Bank::default();
            assert!(bank.is_empty());
            assert_eq!(bank.customer_count(), 0);
        }
        #[test]
        fn customers_are_indexed_in_insertion_order() {
            let mut bank = Bank::default();
            bank.add_customer("John", "Smith");
            bank.add_customer("Jane", "Doe");

            assert_eq!(bank.customer_count(), 2);
            assert_eq!(bank.customer(0).unwrap().last_name(), "Smith");
            assert_eq!(bank.customer(1).unwrap().first_name(), "Jane");
            let names: Vec<&str> = bank.customers().map(Customer::last_name).collect();
            assert_eq!(names, vec!["Smith", "Doe"]);
        }
        #[test]
        fn out_of_range_lookup_is_an_error() {
            let mut bank = Bank::default();
            bank.add_customer("John", "Smith");

            assert_eq!(
                bank.customer(1),
                Err(LookupError::CustomerOutOfRange { index: 1, count: 1 })
            );
        }
    }
}
